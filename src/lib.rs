pub mod config;
pub mod data;
pub mod error;

pub use config::{DatasetSource, LoaderConfig};
pub use data::cache::PartitionCache;
pub use data::fetch::{ensure_local, HttpTransport, Transport};
pub use data::loader::HousingData;
pub use data::model::{Partition, RawTable, Xy};
pub use error::{DataError, Result};
