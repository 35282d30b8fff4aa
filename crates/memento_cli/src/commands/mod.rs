pub(crate) mod login;
pub(crate) mod meta;
pub(crate) mod repos;
pub(crate) mod serve;
pub(crate) mod theme;
