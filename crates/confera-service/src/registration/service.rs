//! Registration orchestration — the capacity ledger.
//!
//! Validates a request against the window gate and the eligibility rules,
//! then commits the registration write and the occupancy adjustment
//! against the stores. The seat counter is taken *before* the
//! registration row is written and released again on any failure, the
//! same order the login flow uses for license seats: the conditional
//! counter adjustment is the only way up, so no interleaving of
//! concurrent calls can overshoot capacity.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use confera_core::error::AppError;
use confera_core::types::id::{SessionId, UserId};
use confera_entity::registration::model::Registration;
use confera_entity::registration::store::{InsertOutcome, RegistrationStore};
use confera_entity::session::model::Session;
use confera_entity::session::store::{OccupancyAdjustment, SessionStore};
use confera_entity::settings::source::SettingsSource;

use super::eligibility::{self, Violation};
use super::error::RegistrationError;
use super::gate;

/// How many times an admission re-runs validation after losing a
/// commit-time race before surfacing a storage error.
const MAX_COMMIT_ATTEMPTS: u32 = 3;

/// Which path a request arrived on. Admin requests skip the window gate
/// (on assignment) and the cancellation switch (on removal) but are held
/// to every capacity and uniqueness rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    SelfService,
    Admin,
}

impl Channel {
    fn as_str(self) -> &'static str {
        match self {
            Self::SelfService => "self-service",
            Self::Admin => "admin",
        }
    }
}

/// The registration engine.
///
/// Stateless apart from its store handles; safe to share and call
/// concurrently. All operations take an explicit `now` so tests can pin
/// the clock.
pub struct RegistrationService {
    sessions: Arc<dyn SessionStore>,
    registrations: Arc<dyn RegistrationStore>,
    settings: Arc<dyn SettingsSource>,
}

impl RegistrationService {
    /// Create a new registration service.
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        registrations: Arc<dyn RegistrationStore>,
        settings: Arc<dyn SettingsSource>,
    ) -> Self {
        Self {
            sessions,
            registrations,
            settings,
        }
    }

    /// Self-service registration.
    pub async fn register(
        &self,
        now: DateTime<Utc>,
        user_id: UserId,
        session_id: SessionId,
    ) -> Result<Registration, RegistrationError> {
        self.admit(now, user_id, session_id, Channel::SelfService)
            .await
    }

    /// Admin manual assignment. Skips the registration window but still
    /// enforces duplicate, user-limit, and capacity rules.
    pub async fn admin_assign(
        &self,
        now: DateTime<Utc>,
        user_id: UserId,
        session_id: SessionId,
    ) -> Result<Registration, RegistrationError> {
        self.admit(now, user_id, session_id, Channel::Admin).await
    }

    /// Self-service cancellation.
    pub async fn cancel(
        &self,
        now: DateTime<Utc>,
        user_id: UserId,
        session_id: SessionId,
    ) -> Result<(), RegistrationError> {
        self.withdraw(now, user_id, session_id, Channel::SelfService)
            .await
    }

    /// Admin removal. Skips the cancellation switch.
    pub async fn admin_remove(
        &self,
        now: DateTime<Utc>,
        user_id: UserId,
        session_id: SessionId,
    ) -> Result<(), RegistrationError> {
        self.withdraw(now, user_id, session_id, Channel::Admin).await
    }

    async fn admit(
        &self,
        now: DateTime<Utc>,
        user_id: UserId,
        session_id: SessionId,
        channel: Channel,
    ) -> Result<Registration, RegistrationError> {
        let mut session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or(RegistrationError::SessionNotFound(session_id))?;

        let settings = self.settings.current().await?;

        if channel == Channel::SelfService {
            gate::registration_open(now, &settings, session.kind)
                .map_err(RegistrationError::RegistrationClosed)?;
        }

        for attempt in 1..=MAX_COMMIT_ATTEMPTS {
            if attempt > 1 {
                // Re-read the session so validation runs against fresh
                // state after a lost race.
                session = self
                    .sessions
                    .find_by_id(session_id)
                    .await?
                    .ok_or(RegistrationError::SessionNotFound(session_id))?;
            }

            if self
                .registrations
                .find_active(user_id, session_id)
                .await?
                .is_some()
            {
                return Err(RegistrationError::AlreadyRegistered);
            }

            let workshop_count = if session.is_capacity_limited() {
                self.registrations.count_active_workshops(user_id).await?
            } else {
                0
            };

            eligibility::check_eligibility(&session, workshop_count, session.occupancy, &settings)
                .map_err(|violation| match violation {
                    Violation::UserLimitExceeded { limit } => {
                        RegistrationError::UserLimitExceeded { limit }
                    }
                    Violation::SessionFull => RegistrationError::SessionFull,
                })?;

            // Take the seat first. The conditional adjustment either
            // claims a seat within capacity or rejects wholesale, so a
            // concurrent admission racing for the last seat loses here
            // rather than over-booking.
            if session.is_capacity_limited() {
                match self.sessions.adjust_occupancy(session_id, 1, true).await? {
                    OccupancyAdjustment::Applied { .. } => {}
                    OccupancyAdjustment::CapacityExhausted => {
                        return Err(RegistrationError::SessionFull);
                    }
                    OccupancyAdjustment::NotFound => {
                        return Err(RegistrationError::SessionNotFound(session_id));
                    }
                }
            }

            let outcome = match self
                .registrations
                .insert_active(user_id, session_id, now)
                .await
            {
                Ok(outcome) => outcome,
                Err(e) => {
                    self.release_seat(&session).await;
                    return Err(e.into());
                }
            };

            let registration = match outcome {
                InsertOutcome::Inserted(registration) => registration,
                InsertOutcome::DuplicateActive => {
                    // Lost a same-user race after the seat was taken.
                    self.release_seat(&session).await;
                    return Err(RegistrationError::AlreadyRegistered);
                }
            };

            // Commit-time re-validation of the per-user limit: admissions
            // for the same user against *different* sessions share no
            // counter, so the pre-check alone cannot exclude them. The
            // re-read includes the row just written.
            if session.is_capacity_limited() {
                let total = match self.registrations.count_active_workshops(user_id).await {
                    Ok(total) => total,
                    Err(e) => {
                        self.rollback_admission(&session, &registration, now).await;
                        return Err(e.into());
                    }
                };

                if total > i64::from(settings.max_workshops_per_user) {
                    self.rollback_admission(&session, &registration, now).await;
                    warn!(
                        user_id = %user_id,
                        session_id = %session_id,
                        attempt,
                        "Admission lost a per-user limit race, revalidating"
                    );
                    continue;
                }
            }

            info!(
                user_id = %user_id,
                session_id = %session_id,
                registration_id = %registration.id,
                channel = channel.as_str(),
                "Registration created"
            );
            return Ok(registration);
        }

        Err(RegistrationError::Storage(AppError::conflict(
            "registration could not be settled after concurrent retries",
        )))
    }

    async fn withdraw(
        &self,
        now: DateTime<Utc>,
        user_id: UserId,
        session_id: SessionId,
        channel: Channel,
    ) -> Result<(), RegistrationError> {
        let registration = self
            .registrations
            .find_active(user_id, session_id)
            .await?
            .ok_or(RegistrationError::NotRegistered)?;

        if channel == Channel::SelfService {
            let settings = self.settings.current().await?;
            if !settings.cancellation_enabled {
                return Err(RegistrationError::CancellationDisabled);
            }
        }

        if !self
            .registrations
            .mark_cancelled(registration.id, now)
            .await?
        {
            // Another cancellation got there first; that one owns the
            // seat release.
            return Err(RegistrationError::NotRegistered);
        }

        match self.sessions.find_by_id(session_id).await {
            Ok(Some(session)) if session.is_capacity_limited() => {
                match self.sessions.adjust_occupancy(session_id, -1, false).await {
                    Ok(OccupancyAdjustment::Applied { clamped: true, .. }) => {
                        warn!(
                            session_id = %session_id,
                            "Occupancy was already zero on cancellation; counter had drifted"
                        );
                    }
                    Ok(_) => {}
                    Err(e) => {
                        // The counter stays high, which blocks seats
                        // rather than over-booking, until reconciliation
                        // corrects it.
                        error!(
                            session_id = %session_id,
                            error = %e,
                            "Failed to release seat on cancellation"
                        );
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                error!(
                    session_id = %session_id,
                    error = %e,
                    "Failed to load session while releasing its seat"
                );
            }
        }

        info!(
            user_id = %user_id,
            session_id = %session_id,
            registration_id = %registration.id,
            channel = channel.as_str(),
            "Registration cancelled"
        );
        Ok(())
    }

    /// Give back a seat taken by an admission that did not complete.
    async fn release_seat(&self, session: &Session) {
        if !session.is_capacity_limited() {
            return;
        }
        if let Err(e) = self.sessions.adjust_occupancy(session.id, -1, false).await {
            error!(
                session_id = %session.id,
                error = %e,
                "Failed to release seat after aborted admission"
            );
        }
    }

    /// Undo a committed admission that failed commit-time validation.
    async fn rollback_admission(
        &self,
        session: &Session,
        registration: &Registration,
        now: DateTime<Utc>,
    ) {
        match self
            .registrations
            .mark_cancelled(registration.id, now)
            .await
        {
            // Only the path that cancelled the row releases the seat,
            // otherwise a concurrent cancellation would double-release.
            Ok(true) => self.release_seat(session).await,
            Ok(false) => {}
            Err(e) => {
                error!(
                    registration_id = %registration.id,
                    error = %e,
                    "Failed to roll back admission"
                );
            }
        }
    }
}
