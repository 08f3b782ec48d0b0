pub mod item_generator;
pub mod llm_provider;
pub mod quiz;
pub mod quiz_history;
pub mod quiz_lifecycle;
pub mod syllabus;
pub mod tasks;
