//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; Diesel uses them for
//! compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// Registered users.
    users (id) {
        id -> Int8,
        name -> Varchar,
        /// Unique across all users.
        email -> Varchar,
    }
}

diesel::table! {
    /// Requests for items missing from the catalog.
    item_requests (id) {
        id -> Int8,
        description -> Text,
        requestor_id -> Int8,
        created -> Timestamptz,
    }
}

diesel::table! {
    /// Shareable items listed by their owners.
    items (id) {
        id -> Int8,
        /// Unique per owner.
        name -> Varchar,
        description -> Text,
        available -> Bool,
        owner_id -> Int8,
        request_id -> Nullable<Int8>,
    }
}

diesel::table! {
    /// Time-ranged reservations of items.
    bookings (id) {
        id -> Int8,
        start_date -> Timestamptz,
        end_date -> Timestamptz,
        item_id -> Int8,
        booker_id -> Int8,
        /// One of WAITING, APPROVED, REJECTED.
        status -> Varchar,
    }
}

diesel::table! {
    /// Comments left by past bookers.
    comments (id) {
        id -> Int8,
        text -> Text,
        item_id -> Int8,
        author_id -> Int8,
        created -> Timestamptz,
    }
}

diesel::joinable!(bookings -> items (item_id));
diesel::joinable!(bookings -> users (booker_id));
diesel::joinable!(comments -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(users, item_requests, items, bookings, comments);
