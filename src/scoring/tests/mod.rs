mod common;
mod payday;
