//! Diesel schema for moderation rule persistence.

diesel::table! {
    /// Per-channel allow and ban rules keyed by email address.
    moderation_rules (id) {
        /// Internal rule identifier.
        id -> Uuid,
        /// Channel the rule applies to.
        channel_id -> Uuid,
        /// Normalised email address.
        #[max_length = 254]
        email -> Varchar,
        /// Rule status (allow or ban).
        #[max_length = 16]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
