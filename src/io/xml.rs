//! IOF v3-style XML start-list rendering.
//!
//! Renders a drawn start list as an interchange document: one
//! `ClassStart` per (grade, heat) group, each `PersonStart` carrying the
//! competitor's name, organisation, start time, and draw extensions.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::DrawError;
use crate::models::StartList;

/// Seconds between consecutive start timeslots.
const START_INTERVAL_SECONDS: i64 = 120;

/// Builds [`StartListDocument`]s from drawn start lists.
pub struct XmlStartListCreator {
    interval_seconds: i64,
}

impl Default for XmlStartListCreator {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlStartListCreator {
    /// Creates a creator with the default start interval.
    pub fn new() -> Self {
        Self {
            interval_seconds: START_INTERVAL_SECONDS,
        }
    }

    /// Sets the interval between consecutive timeslots, in seconds.
    pub fn with_interval_seconds(mut self, interval_seconds: i64) -> Self {
        self.interval_seconds = interval_seconds;
        self
    }

    /// Builds the document. Start times are `first_start` plus the
    /// timeslot index times the interval.
    pub fn create(
        &self,
        event_name: &str,
        first_start: DateTime<Utc>,
        start_list: &StartList,
    ) -> StartListDocument {
        let mut class_starts = Vec::new();

        for grade in start_list.grades() {
            for heat in 0..start_list.heat_count() {
                let person_starts: Vec<PersonStart> = start_list
                    .entries_for_heat(heat)
                    .into_iter()
                    .filter(|entry| entry.competitor.grade == grade)
                    .map(|entry| {
                        let start_time = first_start
                            + Duration::seconds(entry.timeslot as i64 * self.interval_seconds);
                        PersonStart {
                            person: Person {
                                id: PersonId {
                                    id_type: "IOF ID".into(),
                                    value: entry.competitor.external_id.to_string(),
                                },
                                name: PersonName {
                                    family: entry.competitor.last_name.clone(),
                                    given: entry.competitor.first_name.clone(),
                                },
                            },
                            organisation: Organisation {
                                name: entry.competitor.federation.clone(),
                            },
                            start: RaceStart {
                                start_time: start_time.to_rfc3339(),
                            },
                            extensions: Extensions {
                                competition_rank: entry.competitor.seed_rank,
                                block: entry.competitor.block.map(|b| b.value()),
                                rank: entry.competitor.rank,
                            },
                        }
                    })
                    .collect();

                if person_starts.is_empty() {
                    continue;
                }

                class_starts.push(ClassStart {
                    class: ClassElement {
                        name: format!("{} - Heat {}", grade, heat + 1),
                    },
                    person_starts,
                });
            }
        }

        StartListDocument {
            xmlns: "http://www.orienteering.org/datastandard/3.0".into(),
            iof_version: "3".into(),
            create_time: Utc::now().to_rfc3339(),
            creator: "Start Draw Generator".into(),
            event: EventElement {
                name: event_name.to_string(),
            },
            class_starts,
        }
    }
}

/// Writes a start-list document to disk as XML.
pub struct XmlExporter {
    destination: PathBuf,
}

impl XmlExporter {
    /// Creates an exporter for the given destination file.
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
        }
    }

    /// Renders and writes the document.
    pub fn export(&self, document: &StartListDocument) -> Result<(), DrawError> {
        fs::write(&self.destination, document.render()?)?;
        Ok(())
    }
}

/// An IOF v3-style start-list document.
#[derive(Debug, Serialize)]
#[serde(rename = "StartList")]
pub struct StartListDocument {
    #[serde(rename = "@xmlns")]
    xmlns: String,
    #[serde(rename = "@iofVersion")]
    iof_version: String,
    #[serde(rename = "@createTime")]
    create_time: String,
    #[serde(rename = "@creator")]
    creator: String,
    #[serde(rename = "Event")]
    event: EventElement,
    #[serde(rename = "ClassStart")]
    class_starts: Vec<ClassStart>,
}

impl StartListDocument {
    /// Renders the document with an XML declaration and indentation.
    pub fn render(&self) -> Result<String, DrawError> {
        let mut body = String::new();
        let mut serializer = quick_xml::se::Serializer::new(&mut body);
        serializer.indent(' ', 2);
        self.serialize(serializer)
            .map_err(|e| DrawError::Xml(e.to_string()))?;
        Ok(format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{body}\n"))
    }
}

#[derive(Debug, Serialize)]
struct EventElement {
    #[serde(rename = "Name")]
    name: String,
}

#[derive(Debug, Serialize)]
struct ClassStart {
    #[serde(rename = "Class")]
    class: ClassElement,
    #[serde(rename = "PersonStart")]
    person_starts: Vec<PersonStart>,
}

#[derive(Debug, Serialize)]
struct ClassElement {
    #[serde(rename = "Name")]
    name: String,
}

#[derive(Debug, Serialize)]
struct PersonStart {
    #[serde(rename = "Person")]
    person: Person,
    #[serde(rename = "Organisation")]
    organisation: Organisation,
    #[serde(rename = "Start")]
    start: RaceStart,
    #[serde(rename = "Extensions")]
    extensions: Extensions,
}

#[derive(Debug, Serialize)]
struct Person {
    #[serde(rename = "Id")]
    id: PersonId,
    #[serde(rename = "Name")]
    name: PersonName,
}

#[derive(Debug, Serialize)]
struct PersonId {
    #[serde(rename = "@type")]
    id_type: String,
    #[serde(rename = "$text")]
    value: String,
}

#[derive(Debug, Serialize)]
struct PersonName {
    #[serde(rename = "Family")]
    family: String,
    #[serde(rename = "Given")]
    given: String,
}

#[derive(Debug, Serialize)]
struct Organisation {
    #[serde(rename = "Name")]
    name: String,
}

#[derive(Debug, Serialize)]
struct RaceStart {
    #[serde(rename = "StartTime")]
    start_time: String,
}

#[derive(Debug, Serialize)]
struct Extensions {
    #[serde(rename = "CompetitionRank")]
    competition_rank: usize,
    #[serde(rename = "Block", skip_serializing_if = "Option::is_none")]
    block: Option<u8>,
    #[serde(rename = "Rank")]
    rank: i32,
}
