use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// One course as served by the catalog API and mirrored into the store.
///
/// Field renames follow the upstream wire names, which are also the column
/// names of the `courses` table. Enrollment and capacity figures are kept as
/// text: the API serves them inconsistently as numbers, strings, or blanks,
/// so they are normalized to text on decode and parsed to integers only when
/// the availability query needs them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct Course {
    #[serde(rename = "Semester", default)]
    #[sqlx(rename = "Semester")]
    pub semester: String,

    #[serde(rename = "CourseNo", default)]
    #[sqlx(rename = "CourseNo")]
    pub course_no: String,

    #[serde(rename = "CourseName", default)]
    #[sqlx(rename = "CourseName")]
    pub course_name: String,

    #[serde(rename = "CourseTeacher", default)]
    #[sqlx(rename = "CourseTeacher")]
    pub course_teacher: String,

    #[serde(rename = "Dimension", default)]
    #[sqlx(rename = "Dimension")]
    pub dimension: String,

    #[serde(rename = "CreditPoint", default, deserialize_with = "text_or_number")]
    #[sqlx(rename = "CreditPoint")]
    pub credit_point: String,

    #[serde(rename = "RequireOption", default)]
    #[sqlx(rename = "RequireOption")]
    pub require_option: String,

    #[serde(rename = "AllYear", default)]
    #[sqlx(rename = "AllYear")]
    pub all_year: String,

    #[serde(rename = "ChooseStudent", default, deserialize_with = "text_or_number")]
    #[sqlx(rename = "ChooseStudent")]
    pub choose_student: String,

    #[serde(rename = "Restrict1", default, deserialize_with = "text_or_number")]
    #[sqlx(rename = "Restrict1")]
    pub restrict1: String,

    #[serde(rename = "Restrict2", default, deserialize_with = "text_or_number")]
    #[sqlx(rename = "Restrict2")]
    pub restrict2: String,

    #[serde(rename = "ThreeStudent", default, deserialize_with = "text_or_number")]
    #[sqlx(rename = "ThreeStudent")]
    pub three_student: String,

    #[serde(rename = "AllStudent", default, deserialize_with = "text_or_number")]
    #[sqlx(rename = "AllStudent")]
    pub all_student: String,

    #[serde(rename = "NTURestrict", default, deserialize_with = "text_or_number")]
    #[sqlx(rename = "NTURestrict")]
    pub ntu_restrict: String,

    #[serde(rename = "NTNURestrict", default, deserialize_with = "text_or_number")]
    #[sqlx(rename = "NTNURestrict")]
    pub ntnu_restrict: String,

    #[serde(rename = "CourseTimes", default)]
    #[sqlx(rename = "CourseTimes")]
    pub course_times: String,

    #[serde(rename = "PracticalTimes", default)]
    #[sqlx(rename = "PracticalTimes")]
    pub practical_times: String,

    #[serde(rename = "ClassRoomNo", default)]
    #[sqlx(rename = "ClassRoomNo")]
    pub class_room_no: String,

    #[serde(rename = "ThreeNode", default)]
    #[sqlx(rename = "ThreeNode")]
    pub three_node: String,

    #[serde(rename = "Node", default)]
    #[sqlx(rename = "Node")]
    pub node: String,

    #[serde(rename = "Contents", default)]
    #[sqlx(rename = "Contents")]
    pub contents: String,

    #[serde(rename = "NTU_People", default, deserialize_with = "text_or_number")]
    #[sqlx(rename = "NTU_People")]
    pub ntu_people: String,

    #[serde(rename = "NTNU_People", default, deserialize_with = "text_or_number")]
    #[sqlx(rename = "NTNU_People")]
    pub ntnu_people: String,

    #[serde(rename = "AbroadPeople", default, deserialize_with = "text_or_number")]
    #[sqlx(rename = "AbroadPeople")]
    pub abroad_people: String,
}

/// Accepts a JSON string, integer, float, or null and normalizes it to text.
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) => s,
        Some(Raw::Int(n)) => n.to_string(),
        Some(Raw::Float(n)) => n.to_string(),
        None => String::new(),
    })
}
