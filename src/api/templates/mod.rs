pub mod gamification_templates;
