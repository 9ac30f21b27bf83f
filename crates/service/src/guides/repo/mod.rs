pub mod seaorm;

pub use seaorm::SeaOrmGuideRepository;
