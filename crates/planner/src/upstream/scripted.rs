//! In-memory planner used by the service tests.

use super::{
    CourseCheck, GeocodePayload, KeywordMatches, PlannerApi, ScheduleResponse, TreeOutcome,
    UpstreamError,
};
use crate::layout::{
    CoordinateTable, CourseCatalog, RawCoordinates, ScheduleOption, ScheduledSection,
    SectionKind, SectionRecord,
};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Default)]
pub(crate) struct ScriptedPlanner {
    pub payload: Arc<GeocodePayload>,
    /// Raw `/_get_tree/` data by requested name
    pub tree_replies: BTreeMap<String, String>,
    /// Normalized ids that `check_course` reports as offered
    pub offered: BTreeSet<String>,
    pub first_option: Option<ScheduleOption>,
    pub next_options: Mutex<VecDeque<Option<ScheduleOption>>>,
    /// Held before `create_schedule` answers, when set
    pub schedule_gate: Option<Arc<Notify>>,
    /// Held before `next_schedule` answers, when set
    pub next_gate: Option<Arc<Notify>>,
    /// Fails every call with this error, when set
    pub failure: Option<UpstreamError>,
    pub tree_requests: Mutex<Vec<String>>,
    pub gather_calls: AtomicUsize,
}

impl ScriptedPlanner {
    /// A planner serving the fixture catalog and coordinates.
    pub fn campus() -> Self {
        Self {
            payload: Arc::new(GeocodePayload {
                data: coords(),
                courses: catalog(),
            }),
            ..Self::default()
        }
    }

    pub fn with_options(
        mut self,
        first: Option<ScheduleOption>,
        rest: impl IntoIterator<Item = Option<ScheduleOption>>,
    ) -> Self {
        self.first_option = first;
        self.next_options = Mutex::new(rest.into_iter().collect());
        self
    }

    fn check_failure(&self) -> Result<(), UpstreamError> {
        match &self.failure {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    fn response(&self, option: Option<ScheduleOption>) -> ScheduleResponse {
        ScheduleResponse {
            option,
            coords: self.payload.data.clone(),
        }
    }
}

#[async_trait]
impl PlannerApi for ScriptedPlanner {
    async fn get_tree(&self, name: &str) -> Result<TreeOutcome, UpstreamError> {
        self.check_failure()?;
        self.tree_requests.lock().unwrap().push(name.to_string());
        let data = self
            .tree_replies
            .get(name)
            .cloned()
            .unwrap_or_else(|| format!("NA {name}"));
        Ok(TreeOutcome::decode(&data))
    }

    async fn keyword_search(&self, keyword: &str) -> Result<KeywordMatches, UpstreamError> {
        self.check_failure()?;
        let mut matches = BTreeMap::new();
        for course in self.offered.iter().filter(|c| c.contains(&keyword.to_uppercase())) {
            matches.insert(course.clone(), serde_json::json!({ "Course Name": course }));
        }
        Ok(KeywordMatches { matches })
    }

    async fn geocode(&self) -> Result<Arc<GeocodePayload>, UpstreamError> {
        self.check_failure()?;
        Ok(self.payload.clone())
    }

    async fn check_course(&self, course: &str) -> Result<CourseCheck, UpstreamError> {
        self.check_failure()?;
        let key = course.trim().to_uppercase().replace(' ', "");
        let offered = self.offered.contains(&key);
        Ok(CourseCheck {
            course: course.to_string(),
            offered,
            name: offered.then(|| key.clone()),
        })
    }

    async fn create_schedule(&self, _courses: &[String]) -> Result<ScheduleResponse, UpstreamError> {
        if let Some(gate) = &self.schedule_gate {
            gate.notified().await;
        }
        self.check_failure()?;
        Ok(self.response(self.first_option.clone()))
    }

    async fn next_schedule(&self) -> Result<ScheduleResponse, UpstreamError> {
        if let Some(gate) = &self.next_gate {
            gate.notified().await;
        }
        self.check_failure()?;
        let next = self.next_options.lock().unwrap().pop_front().flatten();
        Ok(self.response(next))
    }

    async fn gather(&self) -> Result<(), UpstreamError> {
        self.check_failure()?;
        self.gather_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub(crate) fn record(
    course: &str,
    section: &str,
    kind: SectionKind,
    building: &str,
    days: &str,
    time: &str,
) -> SectionRecord {
    SectionRecord {
        course: course.to_string(),
        section: section.to_string(),
        kind,
        building: building.to_string(),
        room: "101".to_string(),
        days: days.to_string(),
        time: time.to_string(),
    }
}

/// A scheduled section meeting once per `(building, days, time)` entry.
pub(crate) fn scheduled(
    course: &str,
    section: &str,
    kind: SectionKind,
    meetings: &[(&str, &str, &str)],
) -> ScheduledSection {
    ScheduledSection {
        course: course.to_string(),
        section: section.to_string(),
        kind,
        buildings: meetings.iter().map(|m| m.0.to_string()).collect(),
        days: meetings.iter().map(|m| m.1.to_string()).collect(),
        times: meetings.iter().map(|m| m.2.to_string()).collect(),
        rooms: meetings.iter().map(|_| "101".to_string()).collect(),
    }
}

/// CSE142 with two lectures and a quiz, CSE351 and EE233 lecture-only.
pub(crate) fn catalog() -> CourseCatalog {
    let cse = BTreeMap::from([
        (
            "CSE142".to_string(),
            vec![
                record("CSE142", "A", SectionKind::Lecture, "KNE", "MWF", "930-1020"),
                record("CSE142", "AA", SectionKind::Quiz, "MGH", "Th", "830-920"),
                record("CSE142", "B", SectionKind::Lecture, "GUG", "MWF", "1130-1220"),
            ],
        ),
        (
            "CSE351".to_string(),
            vec![record("CSE351", "A", SectionKind::Lecture, "EEB", "TTh", "1030-1150")],
        ),
    ]);
    let ee = BTreeMap::from([(
        "EE233".to_string(),
        vec![record("EE233", "A", SectionKind::Lecture, "EEB", "MW", "130-220")],
    )]);

    CourseCatalog(BTreeMap::from([
        ("CSE".to_string(), cse),
        ("EE".to_string(), ee),
    ]))
}

/// EEB, KNE and MGH are plottable, GUG geocoding failed.
pub(crate) fn coords() -> CoordinateTable {
    let entry = |latitude: &str, longitude: &str| RawCoordinates {
        latitude: latitude.to_string(),
        longitude: longitude.to_string(),
        name: None,
    };

    BTreeMap::from([
        ("EEB".to_string(), entry("47.6532", "-122.3061")),
        ("KNE".to_string(), entry("47.6566", "-122.3091")),
        ("MGH".to_string(), entry("47.6550", "-122.3078")),
        ("GUG".to_string(), entry("", "")),
    ])
}

/// One option: CSE351 A in EEB, EE233 A in EEB then KNE.
pub(crate) fn option(header_course: &str) -> ScheduleOption {
    ScheduleOption(vec![
        vec![scheduled(
            header_course,
            "A",
            SectionKind::Lecture,
            &[("EEB", "TTh", "1030-1150")],
        )],
        vec![scheduled(
            "EE233",
            "A",
            SectionKind::Lecture,
            &[("EEB", "M", "130-220"), ("KNE", "W", "130-220")],
        )],
    ])
}
