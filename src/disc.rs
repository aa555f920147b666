pub mod boundary;
pub mod elliptic1d;
pub mod mesh;
