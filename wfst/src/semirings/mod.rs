pub use self::adder::{Adder, LogAdder, PairAdder, SimpleAdder};
pub use self::boolean_weight::BooleanWeight;
pub use self::expectation_weight::ExpectationWeight;
pub use self::gallic_weight::{GallicWeightLeft, GallicWeightRestrict, GallicWeightRight};
pub use self::integer_weight::IntegerWeight;
pub use self::lexicographic_weight::LexicographicWeight;
pub use self::log_weight::LogWeight;
pub use self::minmax_weight::MinMaxWeight;
pub use self::power_weight::PowerWeight;
pub use self::probability_weight::ProbabilityWeight;
pub use self::product_weight::ProductWeight;
pub use self::semiring::{
    DivideType, ReverseBack, Semiring, SemiringProperties, SerializableSemiring,
    WeaklyDivisibleSemiring, WeightQuantize,
};
pub use self::signed_log_weight::SignedLogWeight;
pub use self::string_variant::StringWeightVariant;
pub use self::string_weight::{StringWeightLeft, StringWeightRestrict, StringWeightRight};
pub use self::tropical_weight::TropicalWeight;
pub use self::tuple_weight::TupleWeight;

#[macro_use]
mod semiring;

mod adder;
mod boolean_weight;
mod expectation_weight;
mod gallic_weight;
mod integer_weight;
mod lexicographic_weight;
mod log_weight;
mod minmax_weight;
mod power_weight;
mod probability_weight;
mod product_weight;
mod signed_log_weight;
mod string_variant;
mod string_weight;
mod tropical_weight;
mod tuple_weight;
pub(crate) mod utils_float;

#[cfg(test)]
mod tests;
