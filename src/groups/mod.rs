pub mod group;
pub(crate) mod membership;

pub use group::{add_to_group, delete_from_all_groups, remove_from_group, Group, GroupId};
