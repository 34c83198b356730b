/// Library configuration, threaded explicitly through the constructors that
/// honor it. The field names mirror the flags recognized by the command line
/// tools (`--fst_error_fatal`, `--fst_weight_separator`,
/// `--fst_weight_parentheses`, `--fst_default_cache_gc`,
/// `--fst_default_cache_gc_limit`).
#[derive(Debug, Clone, PartialEq)]
pub struct FstConfig {
    /// When true, recoverable failures (non-member weights handed to checked
    /// mutations, a compactor rejecting its input) return a hard error;
    /// when false they mark the machine with the sticky `ERROR` property and
    /// computation continues. Unsafe `*_unchecked` mutation paths never
    /// fail and always fall back to marking.
    pub error_fatal: bool,
    /// Separator between the components of a composite weight in text form.
    pub weight_separator: char,
    /// Open/close pair bracketing composite weights in text form. Required as
    /// soon as composites nest.
    pub weight_parentheses: Option<(char, char)>,
    /// Whether lazy-FST caches garbage collect once over budget.
    pub cache_gc: bool,
    /// Cache byte budget before garbage collection kicks in. 0 disables
    /// caching altogether.
    pub cache_gc_limit: usize,
}

impl Default for FstConfig {
    fn default() -> Self {
        FstConfig {
            error_fatal: true,
            weight_separator: ',',
            weight_parentheses: None,
            cache_gc: true,
            cache_gc_limit: 1 << 20,
        }
    }
}
