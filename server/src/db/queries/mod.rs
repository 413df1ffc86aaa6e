pub mod channels;
pub mod join_requests;
pub mod memberships;
pub mod messages;
pub mod users;
