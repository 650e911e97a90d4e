pub mod helmholtz;
