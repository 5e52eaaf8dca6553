pub mod convergence;
pub mod profiles;
pub mod track;
