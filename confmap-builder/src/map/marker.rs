use confmap_common::ConferenceRecord;

use super::scene::{Marker, MarkerIcon, Popup};

const LINK_LABEL: &str = "Discover";

/// Pin + popup for one conference
pub struct LocationMarker<'a> {
    icon: &'a MarkerIcon,
}

impl<'a> LocationMarker<'a> {
    pub fn new(icon: &'a MarkerIcon) -> Self {
        Self { icon }
    }

    /// `None` when the record has no finite position
    pub fn render(&self, record: &ConferenceRecord) -> Option<Marker> {
        let position = record.position()?;

        Some(Marker {
            position,
            icon: Some(self.icon.clone()),
            popup: Popup::Conference {
                title: record.title.clone(),
                location: record.location.clone(),
                date: record.date.clone(),
                url: record.conference_url.clone(),
                link_label: LINK_LABEL.to_string(),
            },
        })
    }
}
