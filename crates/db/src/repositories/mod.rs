pub mod bot_settings_repo;
pub mod recommendation_repo;

pub use bot_settings_repo::BotSettingsRepo;
pub use recommendation_repo::RecommendationRepo;
