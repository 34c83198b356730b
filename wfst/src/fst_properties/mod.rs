pub use self::compute::{compute_fst_properties, verify_properties};
pub use self::mutable_properties::{
    add_state_properties, add_tr_properties, delete_all_states_properties,
    delete_states_properties, delete_trs_properties, set_final_properties, set_start_properties,
};
pub use self::properties::FstProperties;

mod compute;
mod mutable_properties;
mod properties;
