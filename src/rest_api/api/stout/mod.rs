mod iupac_to_smiles;
pub use iupac_to_smiles::*;

mod smiles_to_iupac;
pub use smiles_to_iupac::*;
