//! Crew membership, event participations, and the crew statistics.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::ShoreSquadError;
use crate::forms::{JoinCrewForm, ValidationError};
use crate::ids::IdGenerator;
use crate::model::{CrewMember, CrewStats, EventId, MemberId, Participation, ParticipationId};
use crate::ports::{Clock, KeyValueStore};
use crate::storage::{CREW_MEMBERS_KEY, PARTICIPATIONS_KEY, load_collection, persist_quietly};

/// Kilograms of trash credited per member in the stats panel.
pub const TRASH_PER_MEMBER_KG: u64 = 12;

/// Joined members and participation records, persisted on every change.
pub struct CrewStore {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    ids: Arc<IdGenerator>,
    members: Vec<CrewMember>,
    participations: Vec<Participation>,
}

impl CrewStore {
    /// Restore both collections from `store`, defaulting to empty.
    #[must_use]
    pub fn load(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        ids: Arc<IdGenerator>,
    ) -> Self {
        let members: Vec<CrewMember> = load_collection(store.as_ref(), CREW_MEMBERS_KEY);
        let participations: Vec<Participation> =
            load_collection(store.as_ref(), PARTICIPATIONS_KEY);

        let highest = members
            .iter()
            .map(|member| member.id.0)
            .chain(participations.iter().map(|record| record.id.0))
            .max()
            .unwrap_or_default();
        ids.observe(highest);

        debug!(
            members = members.len(),
            participations = participations.len(),
            "crew store loaded"
        );

        Self {
            store,
            clock,
            ids,
            members,
            participations,
        }
    }

    /// Validate the form and add a new member.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming each empty or malformed field.
    pub fn join(&mut self, form: &JoinCrewForm) -> Result<CrewMember, ValidationError> {
        let application = form.validate()?;
        let now = self.clock.now();

        let member = CrewMember {
            id: MemberId(self.ids.next(now)),
            name: application.name,
            email: application.email,
            motivation: application.motivation,
            joined_date: self.clock.today(),
            cleanups_attended: 0,
        };

        self.members.push(member.clone());
        persist_quietly(self.store.as_ref(), CREW_MEMBERS_KEY, &self.members);
        info!(member = member.id.0, "crew member joined");
        Ok(member)
    }

    /// Members in join order.
    #[must_use]
    pub fn members(&self) -> &[CrewMember] {
        &self.members
    }

    /// Participations in the order they were recorded.
    #[must_use]
    pub fn participations(&self) -> &[Participation] {
        &self.participations
    }

    /// Aggregate numbers for the crew panel.
    #[must_use]
    pub fn stats(&self) -> CrewStats {
        let member_count = self.members.len();
        let total_cleanups_attended = self
            .members
            .iter()
            .map(|member| u64::from(member.cleanups_attended))
            .sum();
        CrewStats {
            member_count,
            total_cleanups_attended,
            estimated_trash_collected: (member_count as u64).saturating_mul(TRASH_PER_MEMBER_KG),
        }
    }

    /// Record that the user joined an event.
    ///
    /// Joining the same event again appends another record.
    ///
    /// # Errors
    ///
    /// Returns [`ShoreSquadError::MustJoinCrewFirst`] when nobody has joined the crew yet.
    pub fn record_participation(
        &mut self,
        event_id: &EventId,
        event_title: &str,
    ) -> Result<Participation, ShoreSquadError> {
        if self.members.is_empty() {
            return Err(ShoreSquadError::MustJoinCrewFirst);
        }

        let now = self.clock.now();
        let participation = Participation {
            id: ParticipationId(self.ids.next(now)),
            event_id: event_id.clone(),
            event_title: event_title.to_owned(),
            joined_at: now,
        };

        self.participations.push(participation.clone());
        persist_quietly(self.store.as_ref(), PARTICIPATIONS_KEY, &self.participations);
        info!(event = %event_id, "participation recorded");
        Ok(participation)
    }

    /// Whether any participation exists for `event_id`.
    #[must_use]
    pub fn has_joined(&self, event_id: &EventId) -> bool {
        self.participations
            .iter()
            .any(|record| &record.event_id == event_id)
    }
}
