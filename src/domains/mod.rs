pub mod gamification;

pub use gamification as gamification_service;
