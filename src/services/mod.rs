pub mod extractors;
pub mod formatter;
pub mod material_service;
pub mod model_service;
pub mod prompt_builder;
pub mod quiz_parser;
pub mod tutor_service;
