//! Retrieved references attached to an assistant answer.
//!
//! The backend sends sources as loosely shaped JSON objects. Building a
//! [`Source`] never fails: missing fields fall back to placeholders and a
//! missing URL is derived from the identifying fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Most sources kept on one assistant message.
pub const MAX_SOURCES: usize = 5;

pub const UNKNOWN_UNIVERSITY: &str = "Unknown University";
pub const UNKNOWN_COURSE: &str = "Course Title";
pub const UNKNOWN_COUNTRY: &str = "N/A";

/// Intent label the backend uses for university searches.
pub const UNIVERSITY_SEARCH: &str = "UNIVERSITY_SEARCH";

/// Intent classified by the backend for a turn.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Intent(String);

impl Intent {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sources of a university search describe institutions, all others describe courses.
    pub fn is_university_search(&self) -> bool {
        self.0 == UNIVERSITY_SEARCH
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UniversitySource {
    pub name: String,
    pub country: String,
    pub ref_id: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CourseSource {
    pub name: String,
    pub university_name: String,
    pub country: String,
    pub edp_ref_id: String,
    pub course_level: String,
    pub slug: String,
    pub url: String,
}

/// A retrieved reference, shaped by the turn's intent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Source {
    University(UniversitySource),
    Course(CourseSource),
}

impl Source {
    /// Build a source from a raw backend object.
    ///
    /// `site_url` is the base used when the object has no explicit `url`.
    pub fn from_value(intent: &Intent, value: &Value, site_url: &str) -> Self {
        if intent.is_university_search() {
            Source::University(university_from_value(value, site_url))
        } else {
            Source::Course(course_from_value(value, site_url))
        }
    }

    /// Build at most [`MAX_SOURCES`] sources, keeping backend order.
    pub fn list_from_values(intent: &Intent, values: &[Value], site_url: &str) -> Vec<Self> {
        values
            .iter()
            .take(MAX_SOURCES)
            .map(|value| Self::from_value(intent, value, site_url))
            .collect()
    }

    /// Headline shown for the source.
    pub fn title(&self) -> &str {
        match self {
            Source::University(u) => &u.name,
            Source::Course(c) => &c.name,
        }
    }

    pub fn country(&self) -> &str {
        match self {
            Source::University(u) => &u.country,
            Source::Course(c) => &c.country,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Source::University(u) => &u.url,
            Source::Course(c) => &c.url,
        }
    }
}

/// `{base}/institutions/{ref_id}/`
pub fn university_url(site_url: &str, ref_id: &str) -> String {
    format!("{}/institutions/{}/", site_url.trim_end_matches('/'), ref_id)
}

/// `{base}/institutions/{edp_ref_id}/{course_level lowercased}/{slug}/`
pub fn course_url(site_url: &str, edp_ref_id: &str, course_level: &str, slug: &str) -> String {
    format!(
        "{}/institutions/{}/{}/{}/",
        site_url.trim_end_matches('/'),
        edp_ref_id,
        course_level.to_lowercase(),
        slug
    )
}

fn university_from_value(value: &Value, site_url: &str) -> UniversitySource {
    let ref_id = text_at(value, &["refId"]).unwrap_or_default();
    let url = explicit_url(value).unwrap_or_else(|| university_url(site_url, &ref_id));
    UniversitySource {
        name: text_at(value, &["name"]).unwrap_or_else(|| UNKNOWN_UNIVERSITY.to_string()),
        country: text_at(value, &["address", "country"])
            .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string()),
        ref_id,
        url,
    }
}

fn course_from_value(value: &Value, site_url: &str) -> CourseSource {
    let edp_ref_id = text_at(value, &["edpRefId"]).unwrap_or_default();
    let course_level = text_at(value, &["courseLevel"]).unwrap_or_default();
    let slug = text_at(value, &["slug"]).unwrap_or_default();
    let url = explicit_url(value)
        .unwrap_or_else(|| course_url(site_url, &edp_ref_id, &course_level, &slug));
    CourseSource {
        name: text_at(value, &["name"]).unwrap_or_else(|| UNKNOWN_COURSE.to_string()),
        university_name: text_at(value, &["institution", "name"])
            .unwrap_or_else(|| UNKNOWN_UNIVERSITY.to_string()),
        country: text_at(value, &["institution", "address", "country"])
            .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string()),
        edp_ref_id,
        course_level,
        slug,
        url,
    }
}

fn explicit_url(value: &Value) -> Option<String> {
    text_at(value, &["url"]).filter(|url| !url.trim().is_empty())
}

/// Follow `path` through nested objects; strings and numbers both count as text.
fn text_at(value: &Value, path: &[&str]) -> Option<String> {
    let mut current = value;
    for key in path {
        current = current.get(key)?;
    }
    match current {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SITE: &str = "https://edvoy.com";

    fn course_intent() -> Intent {
        Intent::new("COURSE_SEARCH")
    }

    #[test]
    fn test_course_url_is_derived_when_missing() {
        let value = json!({"edpRefId": "X", "courseLevel": "Masters", "slug": "y"});
        let source = Source::from_value(&course_intent(), &value, SITE);
        assert_eq!(source.url(), "https://edvoy.com/institutions/X/masters/y/");
    }

    #[test]
    fn test_explicit_url_wins() {
        let value = json!({"edpRefId": "X", "courseLevel": "Masters", "slug": "y", "url": "https://example.org/c"});
        let source = Source::from_value(&course_intent(), &value, SITE);
        assert_eq!(source.url(), "https://example.org/c");
    }

    #[test]
    fn test_blank_explicit_url_counts_as_missing() {
        let value = json!({"refId": "derby", "url": "  "});
        let source = Source::from_value(&Intent::new(UNIVERSITY_SEARCH), &value, SITE);
        assert_eq!(source.url(), "https://edvoy.com/institutions/derby/");
    }

    #[test]
    fn test_university_fields() {
        let value = json!({
            "name": "University of Derby",
            "address": {"country": "United Kingdom"},
            "refId": "university-of-derby"
        });
        let source = Source::from_value(&Intent::new(UNIVERSITY_SEARCH), &value, SITE);
        assert_eq!(
            source,
            Source::University(UniversitySource {
                name: "University of Derby".to_string(),
                country: "United Kingdom".to_string(),
                ref_id: "university-of-derby".to_string(),
                url: "https://edvoy.com/institutions/university-of-derby/".to_string(),
            })
        );
    }

    #[test]
    fn test_course_fields_from_nested_institution() {
        let value = json!({
            "name": "MSc Data Science",
            "institution": {"name": "University of Derby", "address": {"country": "United Kingdom"}},
            "edpRefId": "derby",
            "courseLevel": "POSTGRADUATE",
            "slug": "msc-data-science"
        });
        match Source::from_value(&course_intent(), &value, SITE) {
            Source::Course(course) => {
                assert_eq!(course.name, "MSc Data Science");
                assert_eq!(course.university_name, "University of Derby");
                assert_eq!(course.country, "United Kingdom");
                assert_eq!(
                    course.url,
                    "https://edvoy.com/institutions/derby/postgraduate/msc-data-science/"
                );
            }
            other => panic!("expected a course, got {:?}", other),
        }
    }

    #[test]
    fn test_placeholders_for_arbitrary_payloads() {
        for value in [json!({}), json!(null), json!(42), json!(["a"]), json!({"name": {"x": 1}})] {
            let course = Source::from_value(&course_intent(), &value, SITE);
            assert_eq!(course.title(), UNKNOWN_COURSE);
            assert_eq!(course.country(), UNKNOWN_COUNTRY);
            assert_eq!(course.url(), "https://edvoy.com/institutions////");

            let university = Source::from_value(&Intent::new(UNIVERSITY_SEARCH), &value, SITE);
            assert_eq!(university.title(), UNKNOWN_UNIVERSITY);
            assert_eq!(university.country(), UNKNOWN_COUNTRY);
        }
    }

    #[test]
    fn test_numeric_ref_id_is_accepted() {
        let value = json!({"refId": 1234});
        let source = Source::from_value(&Intent::new(UNIVERSITY_SEARCH), &value, SITE);
        assert_eq!(source.url(), "https://edvoy.com/institutions/1234/");
    }

    #[test]
    fn test_site_url_trailing_slash_is_ignored() {
        assert_eq!(
            university_url("https://edvoy.com/", "a"),
            "https://edvoy.com/institutions/a/"
        );
    }

    #[test]
    fn test_list_keeps_first_five_in_order() {
        let values: Vec<Value> = (0..10).map(|i| json!({"name": format!("c{}", i)})).collect();
        let sources = Source::list_from_values(&course_intent(), &values, SITE);
        let titles: Vec<&str> = sources.iter().map(Source::title).collect();
        assert_eq!(titles, vec!["c0", "c1", "c2", "c3", "c4"]);
    }
}
