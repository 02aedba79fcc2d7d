use crate::reconcile::{overlaps, ReconcileError};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifiant fort pour Person
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(String);

impl PersonId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Personne de la rotation (fournie par l'annuaire)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    /// Adresse utilisée pour retrouver l'agenda de la personne.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

impl Person {
    pub fn new<I: AsRef<str>, N: Into<String>>(id: I, name: N) -> Self {
        Self {
            id: PersonId::new(id),
            name: name.into(),
            contact: None,
        }
    }

    pub fn with_contact<C: Into<String>>(mut self, contact: C) -> Self {
        self.contact = Some(contact.into());
        self
    }
}

/// Indisponibilité issue de l'agenda (UTC).
///
/// Un intervalle de durée nulle est accepté : un événement « journée »
/// normalisé à minuit peut se réduire à un instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BusyInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ReconcileError> {
        if end < start {
            return Err(ReconcileError::InvalidTimeRange);
        }
        Ok(Self { start, end })
    }
}

/// Forme brute lue depuis un snapshot, validée par les constructeurs.
#[derive(Deserialize)]
struct RawInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawInterval> for BusyInterval {
    type Error = ReconcileError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

/// Identité d'un shift : sa position dans le `Schedule` qui le possède.
///
/// Deux shifts aux champs identiques restent distincts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShiftId(usize);

impl ShiftId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Créneau d'astreinte (UTC) et la personne qui le tient.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawShift")]
pub struct Shift {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub person: Person,
}

impl Shift {
    /// Crée un shift en validant que `end > start`.
    pub fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        person: Person,
    ) -> Result<Self, ReconcileError> {
        if end <= start {
            return Err(ReconcileError::InvalidTimeRange);
        }
        Ok(Self { start, end, person })
    }
}

#[derive(Deserialize)]
struct RawShift {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    person: Person,
}

impl TryFrom<RawShift> for Shift {
    type Error = ReconcileError;

    fn try_from(raw: RawShift) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end, raw.person)
    }
}

/// Rotation ordonnée. L'ordre fourni est conservé tel quel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    entries: Vec<Shift>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named<S: Into<String>>(name: S) -> Self {
        Self {
            name: Some(name.into()),
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, shift: Shift) -> ShiftId {
        self.entries.push(shift);
        ShiftId(self.entries.len() - 1)
    }

    pub fn get(&self, id: ShiftId) -> Option<&Shift> {
        self.entries.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShiftId, &Shift)> + '_ {
        self.entries.iter().enumerate().map(|(i, s)| (ShiftId(i), s))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Personnes distinctes de la rotation, dans l'ordre d'apparition.
    pub fn people(&self) -> Vec<&Person> {
        let mut out: Vec<&Person> = Vec::new();
        for shift in &self.entries {
            if !out.iter().any(|p| p.id == shift.person.id) {
                out.push(&shift.person);
            }
        }
        out
    }

    /// Ne garde que les shifts qui intersectent `[since, until)`.
    ///
    /// Les identifiants sont réattribués : un `ShiftId` obtenu avant le
    /// filtrage n'est plus valable après.
    pub fn retain_between(&mut self, since: DateTime<Utc>, until: DateTime<Utc>) {
        self.entries
            .retain(|s| overlaps(s.start, s.end, since, until));
    }
}

/// Agenda par personne : ses intervalles d'indisponibilité.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarIndex {
    by_person: HashMap<PersonId, Vec<BusyInterval>>,
}

impl CalendarIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intervalles connus pour `person` (vide si aucune entrée).
    pub fn busy(&self, person: &PersonId) -> &[BusyInterval] {
        self.by_person
            .get(person)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn insert(&mut self, person: PersonId, interval: BusyInterval) {
        self.by_person.entry(person).or_default().push(interval);
    }

    pub fn len(&self) -> usize {
        self.by_person.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_person.is_empty()
    }

    /// Ne garde que les intervalles qui intersectent `[since, until)`.
    pub fn retain_between(&mut self, since: DateTime<Utc>, until: DateTime<Utc>) {
        for intervals in self.by_person.values_mut() {
            intervals.retain(|b| overlaps(b.start, b.end, since, until));
        }
    }
}

/// Fenêtre d'analyse : `days` jours à partir de `start`.
///
/// La rotation est chargée `between_days` plus tôt afin que la règle de
/// repos voie les shifts qui précèdent la fenêtre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: NaiveDate,
    pub days: u32,
    pub between_days: u32,
}

impl Window {
    pub fn calendar_bounds(&self) -> Result<(DateTime<Utc>, DateTime<Utc>), ReconcileError> {
        let start = midnight_utc(self.start);
        let end = start
            .checked_add_signed(Duration::days(i64::from(self.days)))
            .ok_or(ReconcileError::WindowOutOfRange)?;
        Ok((start, end))
    }

    pub fn schedule_bounds(&self) -> Result<(DateTime<Utc>, DateTime<Utc>), ReconcileError> {
        let (start, end) = self.calendar_bounds()?;
        let since = start
            .checked_sub_signed(Duration::days(i64::from(self.between_days)))
            .ok_or(ReconcileError::WindowOutOfRange)?;
        Ok((since, end))
    }
}

/// Minuit UTC pour une date civile.
pub fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
}
