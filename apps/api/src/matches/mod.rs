// Match generation: pairs one resume with one job description and stores
// four scores plus feedback text. Scores are content-blind by default.

pub mod handlers;
pub mod scorer;
pub mod store;
