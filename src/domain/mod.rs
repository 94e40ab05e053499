pub mod assumptions;
pub mod evaluation;
pub mod finance;
pub mod market;
pub mod property;

pub use assumptions::Assumptions;
pub use evaluation::{Evaluation, FlowDetails};
pub use market::{AreaSnapshot, DemandLevel, MarketStats, PricePosition};
pub use property::{ComparableListing, Flow, ListingStatus, PropertyStatus, SubjectProperty};
