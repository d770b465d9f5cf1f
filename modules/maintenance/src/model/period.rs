use std::{borrow::Cow, fmt, str::FromStr};
use time::{Date, Month, OffsetDateTime};
use utoipa::{
    PartialSchema, ToSchema,
    openapi::{RefOr, Schema},
};

/// A half of a year.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
    utoipa::ToSchema,
)]
pub enum Semester {
    /// January to June
    S1,
    /// July to December
    S2,
}

impl Semester {
    pub fn of(month: Month) -> Self {
        if u8::from(month) <= 6 { Self::S1 } else { Self::S2 }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PeriodError {
    #[error("invalid period '{0}', expected 'S1-YYYY' or 'S2-YYYY'")]
    Format(String),
}

/// A reporting cycle, written as `S1-2025`.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(into = "String", try_from = "String")]
pub struct Period {
    pub year: i32,
    pub semester: Semester,
}

impl Period {
    pub fn new(semester: Semester, year: i32) -> Self {
        Self { year, semester }
    }

    /// The period a date falls into.
    pub fn of(date: Date) -> Self {
        Self::new(Semester::of(date.month()), date.year())
    }

    pub fn current() -> Self {
        Self::of(OffsetDateTime::now_utc().date())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:04}", self.semester, self.year)
    }
}

impl FromStr for Period {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || PeriodError::Format(s.to_string());

        let (semester, year) = s.split_once('-').ok_or_else(err)?;
        let semester = semester.parse::<Semester>().map_err(|_| err())?;
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let year = year.parse().map_err(|_| err())?;

        Ok(Self::new(semester, year))
    }
}

impl TryFrom<String> for Period {
    type Error = PeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(value: Period) -> Self {
        value.to_string()
    }
}

/// Serialized as `S1-2025`.
impl ToSchema for Period {
    fn name() -> Cow<'static, str> {
        "Period".into()
    }
}

impl PartialSchema for Period {
    fn schema() -> RefOr<Schema> {
        String::schema()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;
    use time::macros::date;

    #[rstest]
    #[case("S1-2025", Period::new(Semester::S1, 2025))]
    #[case("S2-2024", Period::new(Semester::S2, 2024))]
    fn parse(#[case] input: &str, #[case] expected: Period) {
        assert_eq!(input.parse::<Period>(), Ok(expected));
        assert_eq!(expected.to_string(), input);
    }

    #[rstest]
    #[case("")]
    #[case("S3-2025")]
    #[case("s1-2025")]
    #[case("S1-25")]
    #[case("S1-+025")]
    #[case("S1_2025")]
    #[case("S1-2025-1")]
    fn reject(#[case] input: &str) {
        assert_eq!(
            input.parse::<Period>(),
            Err(PeriodError::Format(input.to_string()))
        );
    }

    #[rstest]
    #[case(date!(2025 - 01 - 01), "S1-2025")]
    #[case(date!(2025 - 06 - 30), "S1-2025")]
    #[case(date!(2025 - 07 - 01), "S2-2025")]
    #[case(date!(2024 - 12 - 31), "S2-2024")]
    fn derive_from_date(#[case] date: Date, #[case] expected: &str) {
        assert_eq!(Period::of(date).to_string(), expected);
    }

    #[test]
    fn serde() -> anyhow::Result<()> {
        let period: Period = serde_json::from_str(r#""S2-2026""#)?;
        assert_eq!(period, Period::new(Semester::S2, 2026));
        assert_eq!(serde_json::to_string(&period)?, r#""S2-2026""#);
        assert!(serde_json::from_str::<Period>(r#""2026""#).is_err());
        Ok(())
    }
}
