use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

#[cfg(feature = "database")]
#[allow(unused_imports)]
use sea_orm::{DeriveActiveEnum, EnumIter, sea_query::StringLen};

/// Teaching day of a time slot. Stored as its ordinal so that rows sort by
/// weekday rather than alphabetically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(
    feature = "database",
    derive(EnumIter, DeriveActiveEnum),
    sea_orm(rs_type = "i16", db_type = "SmallInteger")
)]
pub enum Day {
    #[cfg_attr(feature = "database", sea_orm(num_value = 1))]
    Monday,
    #[cfg_attr(feature = "database", sea_orm(num_value = 2))]
    Tuesday,
    #[cfg_attr(feature = "database", sea_orm(num_value = 3))]
    Wednesday,
    #[cfg_attr(feature = "database", sea_orm(num_value = 4))]
    Thursday,
    #[cfg_attr(feature = "database", sea_orm(num_value = 5))]
    Friday,
    #[cfg_attr(feature = "database", sea_orm(num_value = 6))]
    Saturday,
}

impl Day {
    pub const ALL: [Day; 6] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Day::Monday => "MONDAY",
            Day::Tuesday => "TUESDAY",
            Day::Wednesday => "WEDNESDAY",
            Day::Thursday => "THURSDAY",
            Day::Friday => "FRIDAY",
            Day::Saturday => "SATURDAY",
        }
    }
}

impl Display for Day {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for Day {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Day::ALL
            .into_iter()
            .find(|day| day.as_str().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(
    feature = "database",
    derive(EnumIter, DeriveActiveEnum),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")
)]
pub enum RoomType {
    #[default]
    #[cfg_attr(feature = "database", sea_orm(string_value = "CLASSROOM"))]
    Classroom,
    #[cfg_attr(feature = "database", sea_orm(string_value = "LAB"))]
    Lab,
    #[cfg_attr(feature = "database", sea_orm(string_value = "AUDITORIUM"))]
    Auditorium,
    #[cfg_attr(feature = "database", sea_orm(string_value = "SEMINAR_HALL"))]
    SeminarHall,
}

impl RoomType {
    pub fn as_str(self) -> &'static str {
        match self {
            RoomType::Classroom => "CLASSROOM",
            RoomType::Lab => "LAB",
            RoomType::Auditorium => "AUDITORIUM",
            RoomType::SeminarHall => "SEMINAR_HALL",
        }
    }
}

impl Display for RoomType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(
    feature = "database",
    derive(EnumIter, DeriveActiveEnum),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")
)]
pub enum SubjectType {
    #[default]
    #[cfg_attr(feature = "database", sea_orm(string_value = "THEORY"))]
    Theory,
    #[cfg_attr(feature = "database", sea_orm(string_value = "PRACTICAL"))]
    Practical,
    #[cfg_attr(feature = "database", sea_orm(string_value = "TUTORIAL"))]
    Tutorial,
}

impl SubjectType {
    pub fn as_str(self) -> &'static str {
        match self {
            SubjectType::Theory => "THEORY",
            SubjectType::Practical => "PRACTICAL",
            SubjectType::Tutorial => "TUTORIAL",
        }
    }
}

impl Display for SubjectType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Role of an authenticated user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(
    feature = "database",
    derive(EnumIter, DeriveActiveEnum),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")
)]
pub enum UserRole {
    #[cfg_attr(feature = "database", sea_orm(string_value = "ADMIN"))]
    Admin,
    #[cfg_attr(feature = "database", sea_orm(string_value = "TEACHER"))]
    Teacher,
    #[default]
    #[cfg_attr(feature = "database", sea_orm(string_value = "STUDENT"))]
    Student,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Teacher => "TEACHER",
            UserRole::Student => "STUDENT",
        }
    }
}

impl Display for UserRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_day_order_follows_week() {
        let mut days = vec![Day::Friday, Day::Monday, Day::Saturday, Day::Wednesday];
        days.sort();
        assert_eq!(
            days,
            vec![Day::Monday, Day::Wednesday, Day::Friday, Day::Saturday]
        );
    }

    #[test]
    fn test_day_from_str_ignores_case() {
        assert_eq!(Day::from_str("thursday"), Ok(Day::Thursday));
        assert_eq!(Day::from_str("SUNDAY"), Err(()));
    }

    #[test]
    fn test_enum_json_names() {
        assert_eq!(
            serde_json::to_string(&RoomType::SeminarHall).unwrap(),
            "\"SEMINAR_HALL\""
        );
        assert_eq!(
            serde_json::from_str::<SubjectType>("\"PRACTICAL\"").unwrap(),
            SubjectType::Practical
        );
        assert_eq!(serde_json::to_string(&Day::Monday).unwrap(), "\"MONDAY\"");
        assert_eq!(UserRole::default(), UserRole::Student);
    }
}
