pub mod actions;
pub mod bank;
pub mod chronicle;
pub mod disease;
pub mod economy;
pub mod endgame;
pub mod leadership;
pub mod military;
pub mod population;
pub mod random_events;
pub mod rivals;
pub mod stability;
pub mod weather;
