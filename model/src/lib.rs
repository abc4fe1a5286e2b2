mod address;
mod region;
mod store;

pub use address::{first_line, subregion};
pub use region::Region;
pub use store::StoreRecord;
