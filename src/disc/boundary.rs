pub mod scalar1d;
