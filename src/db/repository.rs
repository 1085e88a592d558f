use sqlx::{FromRow, Row, SqlitePool};
use tracing::{info, warn};

use crate::error::AppError;
use crate::models::Course;

/// Column set the rest of the crate expects, in table order. `ensure_schema`
/// adds any of these that an existing database file is missing.
const EXPECTED_COLUMNS: &[&str] = &[
    "Semester",
    "CourseNo",
    "CourseName",
    "CourseTeacher",
    "Dimension",
    "CreditPoint",
    "RequireOption",
    "AllYear",
    "ChooseStudent",
    "Restrict1",
    "Restrict2",
    "ThreeStudent",
    "AllStudent",
    "NTURestrict",
    "NTNURestrict",
    "CourseTimes",
    "PracticalTimes",
    "ClassRoomNo",
    "ThreeNode",
    "Node",
    "Contents",
    "NTU_People",
    "NTNU_People",
    "AbroadPeople",
];

const CREATE_COURSES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS courses (
        Semester TEXT,
        CourseNo TEXT PRIMARY KEY,
        CourseName TEXT,
        CourseTeacher TEXT,
        Dimension TEXT,
        CreditPoint TEXT,
        RequireOption TEXT,
        AllYear TEXT,
        ChooseStudent TEXT,
        Restrict1 TEXT,
        Restrict2 TEXT,
        ThreeStudent TEXT,
        AllStudent TEXT,
        NTURestrict TEXT,
        NTNURestrict TEXT,
        CourseTimes TEXT,
        PracticalTimes TEXT,
        ClassRoomNo TEXT,
        ThreeNode TEXT,
        Node TEXT,
        Contents TEXT,
        NTU_People TEXT,
        NTNU_People TEXT,
        AbroadPeople TEXT
    )
"#;

const SELECT_COURSES: &str = r#"
    SELECT
        Semester, CourseNo, CourseName, CourseTeacher, Dimension, CreditPoint,
        RequireOption, AllYear, ChooseStudent, Restrict1, Restrict2, ThreeStudent,
        AllStudent, NTURestrict, NTNURestrict, CourseTimes, PracticalTimes,
        ClassRoomNo, ThreeNode, Node, Contents, NTU_People, NTNU_People,
        AbroadPeople
    FROM courses
"#;

const UPSERT_COURSE: &str = r#"
    INSERT OR REPLACE INTO courses
        (Semester, CourseNo, CourseName, CourseTeacher, Dimension, CreditPoint,
        RequireOption, AllYear, ChooseStudent, Restrict1, Restrict2, ThreeStudent,
        AllStudent, NTURestrict, NTNURestrict, CourseTimes, PracticalTimes,
        ClassRoomNo, ThreeNode, Node, Contents, NTU_People, NTNU_People,
        AbroadPeople)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

/// Creates the courses table if absent and adds any expected column an
/// existing table is missing. Additive only: never drops, renames, or
/// rewrites columns or row data. Safe to run on every startup.
pub async fn ensure_schema(db: &SqlitePool) -> Result<(), AppError> {
    sqlx::query(CREATE_COURSES_TABLE).execute(db).await?;

    let info_rows = sqlx::query("PRAGMA table_info(courses)").fetch_all(db).await?;
    let mut existing = Vec::with_capacity(info_rows.len());
    for row in &info_rows {
        existing.push(row.try_get::<String, _>("name")?);
    }

    for column in EXPECTED_COLUMNS {
        if !existing.iter().any(|c| c == column) {
            let ddl = format!("ALTER TABLE courses ADD COLUMN {column} TEXT DEFAULT ''");
            sqlx::query(&ddl).execute(db).await?;
            info!("added missing column {column} to courses table");
        }
    }

    Ok(())
}

/// Insert-or-replace every record, keyed by CourseNo. The batch runs in one
/// transaction; a crash mid-batch leaves the previously committed snapshot
/// intact.
pub async fn upsert_courses(db: &SqlitePool, courses: &[Course]) -> Result<usize, AppError> {
    let mut tx = db.begin().await?;

    for course in courses {
        sqlx::query(UPSERT_COURSE)
            .bind(&course.semester)
            .bind(&course.course_no)
            .bind(&course.course_name)
            .bind(&course.course_teacher)
            .bind(&course.dimension)
            .bind(&course.credit_point)
            .bind(&course.require_option)
            .bind(&course.all_year)
            .bind(&course.choose_student)
            .bind(&course.restrict1)
            .bind(&course.restrict2)
            .bind(&course.three_student)
            .bind(&course.all_student)
            .bind(&course.ntu_restrict)
            .bind(&course.ntnu_restrict)
            .bind(&course.course_times)
            .bind(&course.practical_times)
            .bind(&course.class_room_no)
            .bind(&course.three_node)
            .bind(&course.node)
            .bind(&course.contents)
            .bind(&course.ntu_people)
            .bind(&course.ntnu_people)
            .bind(&course.abroad_people)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(courses.len())
}

/// Reads every mirrored course. A row that no longer decodes (hand-edited
/// database, NULLed column) is logged and skipped rather than failing the
/// whole read.
pub async fn fetch_courses(db: &SqlitePool) -> Result<Vec<Course>, AppError> {
    let rows = sqlx::query(SELECT_COURSES).fetch_all(db).await?;

    let mut courses = Vec::with_capacity(rows.len());
    for row in &rows {
        match Course::from_row(row) {
            Ok(course) => courses.push(course),
            Err(e) => {
                warn!("skipping undecodable course row: {e}");
            }
        }
    }
    Ok(courses)
}

/// The derived "open seats" set: rows whose ChooseStudent and Restrict2 both
/// parse as integers with ChooseStudent < Restrict2. Recomputed fresh on
/// every call, never cached. Rows with non-numeric fields (blank Restrict2
/// means "unlimited" upstream) are excluded and logged, not fatal.
pub async fn fetch_available_courses(db: &SqlitePool) -> Result<Vec<Course>, AppError> {
    let mut available = Vec::new();

    for course in fetch_courses(db).await? {
        match (parse_count(&course.choose_student), parse_count(&course.restrict2)) {
            (Some(chosen), Some(limit)) => {
                if chosen < limit {
                    available.push(course);
                }
            }
            _ => {
                warn!(
                    "excluding course {} from available set: non-numeric enrollment fields (ChooseStudent={:?}, Restrict2={:?})",
                    course.course_no, course.choose_student, course.restrict2
                );
            }
        }
    }

    Ok(available)
}

pub async fn count_courses(db: &SqlitePool) -> Result<i64, AppError> {
    let row = sqlx::query("SELECT COUNT(*) AS n FROM courses").fetch_one(db).await?;
    Ok(row.try_get("n")?)
}

fn parse_count(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}
