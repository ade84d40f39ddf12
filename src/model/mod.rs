pub mod profile;
pub mod slide;

#[cfg(test)]
#[path = "../../tests/unit/model.rs"]
mod tests;
