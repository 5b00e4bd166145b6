pub mod currency;
pub mod locations;
pub mod periods;
pub mod rates;
