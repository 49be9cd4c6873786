//! Groups a course's flat section list into lecture bundles.

use super::error::LayoutError;
use super::types::{lecture_key, SectionKind, SectionRecord};
use serde::Serialize;
use tracing::debug;

/// A lecture and the sub-sections that follow it in the time schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LectureBundle {
    /// `"Lecture " + section label`
    pub key: String,
    pub lecture: SectionRecord,
    pub quizzes: Vec<SectionRecord>,
    pub labs: Vec<SectionRecord>,
    pub studios: Vec<SectionRecord>,
}

impl LectureBundle {
    fn open(lecture: SectionRecord) -> Self {
        Self {
            key: lecture_key(&lecture.section),
            lecture,
            quizzes: Vec::new(),
            labs: Vec::new(),
            studios: Vec::new(),
        }
    }

    /// True when the bundle needs a second grid row.
    pub fn has_quiz_or_lab(&self) -> bool {
        !self.quizzes.is_empty() || !self.labs.is_empty()
    }
}

/// Lecture bundles of one course, in the order the lectures were listed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassifiedCourse {
    bundles: Vec<LectureBundle>,
}

impl ClassifiedCourse {
    pub fn get(&self, key: &str) -> Option<&LectureBundle> {
        self.bundles.iter().find(|b| b.key == key)
    }

    /// First lecture in listing order.
    pub fn first(&self) -> Option<&LectureBundle> {
        self.bundles.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LectureBundle> {
        self.bundles.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.bundles.iter().map(|b| b.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}

/// Fold state: bundles so far plus the index of the lecture in scope.
#[derive(Default)]
struct Accumulator {
    bundles: Vec<LectureBundle>,
    current_lecture: Option<usize>,
}

impl Accumulator {
    fn push(mut self, record: &SectionRecord) -> Result<Self, LayoutError> {
        if record.kind.is_lecture() {
            let key = lecture_key(&record.section);
            let index = match self.bundles.iter().position(|b| b.key == key) {
                Some(existing) => {
                    debug!(course = %record.course, key = %key, "Replacing repeated lecture");
                    self.bundles[existing] = LectureBundle::open(record.clone());
                    existing
                }
                None => {
                    self.bundles.push(LectureBundle::open(record.clone()));
                    self.bundles.len() - 1
                }
            };
            self.current_lecture = Some(index);
            return Ok(self);
        }

        if record.kind == SectionKind::Unknown {
            return Err(LayoutError::UnknownSectionKind {
                course: record.course.clone(),
                section: record.section.clone(),
                kind: record.kind.code().to_string(),
            });
        }

        let index = self
            .current_lecture
            .ok_or_else(|| LayoutError::OrphanSection {
                course: record.course.clone(),
                kind: record.kind.code().to_string(),
                section: record.section.clone(),
            })?;

        let bundle = &mut self.bundles[index];
        let bucket = match record.kind {
            SectionKind::Quiz => &mut bundle.quizzes,
            SectionKind::Lab => &mut bundle.labs,
            _ => &mut bundle.studios,
        };
        bucket.push(record.clone());

        Ok(self)
    }
}

/// Groups sections by lecture, in input order.
///
/// A `LECT` or `VAR` row opens a bundle and becomes the lecture in scope;
/// `QZ`, `LB` and `ST` rows join the lecture in scope. A sub-section with no
/// lecture before it is rejected.
pub fn classify(sections: &[SectionRecord]) -> Result<ClassifiedCourse, LayoutError> {
    let acc = sections
        .iter()
        .try_fold(Accumulator::default(), Accumulator::push)?;

    Ok(ClassifiedCourse {
        bundles: acc.bundles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(kind: SectionKind, section: &str) -> SectionRecord {
        SectionRecord {
            course: "CHEM142".to_string(),
            section: section.to_string(),
            kind,
            building: "BAG".to_string(),
            room: "131".to_string(),
            days: "MWF".to_string(),
            time: "930-1020".to_string(),
        }
    }

    #[test]
    fn test_lecture_then_quiz() {
        let classified =
            classify(&[row(SectionKind::Lecture, "A"), row(SectionKind::Quiz, "AA")]).unwrap();

        assert_eq!(classified.len(), 1);
        let bundle = classified.get("Lecture A").unwrap();
        assert_eq!(bundle.quizzes.len(), 1);
        assert_eq!(bundle.quizzes[0].section, "AA");
        assert!(bundle.labs.is_empty());
    }

    #[test]
    fn test_orphan_quiz_is_rejected() {
        let err = classify(&[row(SectionKind::Quiz, "AA")]).unwrap_err();
        assert!(matches!(err, LayoutError::OrphanSection { ref section, .. } if section == "AA"));
    }

    #[test]
    fn test_sub_sections_follow_most_recent_lecture() {
        let classified = classify(&[
            row(SectionKind::Lecture, "A"),
            row(SectionKind::Quiz, "AA"),
            row(SectionKind::Lab, "AB"),
            row(SectionKind::Variable, "B"),
            row(SectionKind::Studio, "BA"),
            row(SectionKind::Quiz, "BB"),
        ])
        .unwrap();

        let keys: Vec<_> = classified.keys().collect();
        assert_eq!(keys, vec!["Lecture A", "Lecture B"]);

        let a = classified.get("Lecture A").unwrap();
        assert_eq!((a.quizzes.len(), a.labs.len(), a.studios.len()), (1, 1, 0));

        let b = classified.get("Lecture B").unwrap();
        assert_eq!(b.lecture.kind, SectionKind::Variable);
        assert_eq!((b.quizzes.len(), b.labs.len(), b.studios.len()), (1, 0, 1));
    }

    #[test]
    fn test_repeated_lecture_replaces_bundle() {
        let mut again = row(SectionKind::Lecture, "A");
        again.building = "KNE".to_string();

        let classified = classify(&[
            row(SectionKind::Lecture, "A"),
            row(SectionKind::Quiz, "AA"),
            row(SectionKind::Lecture, "B"),
            again,
            row(SectionKind::Lab, "AC"),
        ])
        .unwrap();

        let keys: Vec<_> = classified.keys().collect();
        assert_eq!(keys, vec!["Lecture A", "Lecture B"]);

        let a = classified.get("Lecture A").unwrap();
        assert_eq!(a.lecture.building, "KNE");
        assert!(a.quizzes.is_empty());
        assert_eq!(a.labs.len(), 1);
        assert!(classified.get("Lecture B").unwrap().labs.is_empty());
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let err = classify(&[row(SectionKind::Lecture, "A"), row(SectionKind::Unknown, "AZ")])
            .unwrap_err();
        assert!(matches!(err, LayoutError::UnknownSectionKind { .. }));
    }

    #[test]
    fn test_empty_input() {
        assert!(classify(&[]).unwrap().is_empty());
    }
}
