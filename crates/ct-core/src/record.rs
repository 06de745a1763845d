use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

/// Une entrée brute de l'emploi du temps, telle que renvoyée par la source
/// de données (tableau JSON `{name, teacher, location, weekday, periods, weeks}`).
///
/// Le champ `weeks` est désérialisé de façon défensive : absent ou malformé
/// (pas une collection d'entiers) → ensemble vide → jamais visible.
///
/// # Example
/// ```
/// use ct_core::record::CourseRecord;
/// let json = r#"{"name":"Analysis","teacher":"Wang","location":"A-301",
///                "weekday":1,"periods":[1,2],"weeks":[1,2,3]}"#;
/// let record: CourseRecord = serde_json::from_str(json).unwrap();
/// assert_eq!(record.weekday, 1);
/// assert!(record.weeks.contains(&2));
/// ```
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CourseRecord {
    /// Course name.
    pub name: String,
    /// Teacher name.
    #[serde(default)]
    pub teacher: String,
    /// Room / location.
    #[serde(default)]
    pub location: String,
    /// Weekday, 1 (Monday) to 7 (Sunday).
    pub weekday: u8,
    /// Raw period numbers, 1..=12. Periods 5 and 10 are breaks and are
    /// dropped during mapping.
    #[serde(default)]
    pub periods: Vec<u8>,
    /// Week numbers in which the course meets.
    #[serde(default, deserialize_with = "weeks_or_empty")]
    pub weeks: BTreeSet<u16>,
}

/// Accepte une collection d'entiers ; tout le reste (champ null, scalaire,
/// liste hétérogène) devient l'ensemble vide plutôt qu'une erreur.
fn weeks_or_empty<'de, D>(deserializer: D) -> Result<BTreeSet<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Weeks(BTreeSet<u16>),
        Invalid(serde::de::IgnoredAny),
    }

    Ok(match Lenient::deserialize(deserializer)? {
        Lenient::Weeks(weeks) => weeks,
        Lenient::Invalid(_) => BTreeSet::new(),
    })
}

impl CourseRecord {
    /// True if the weekday falls inside the 1..=7 grid.
    #[must_use]
    pub fn weekday_in_range(&self) -> bool {
        (1..=crate::slots::WEEKDAY_COUNT as u8).contains(&self.weekday)
    }
}
