///! ButterCMS content source
///!
///! Fetches the conference collection, then normalizes the raw entries
///! into `ConferenceRecord`s ready for the map.

pub mod client;
pub mod normalize;
pub mod types;

pub use client::CmsClient;
pub use normalize::{format_relative, normalize_records, DateStyle};
pub use types::{CollectionResponse, RawConference};
