mod image_to_smiles;
pub use image_to_smiles::*;
