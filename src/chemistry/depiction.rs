use poem_openapi::Enum;
use serde::{Deserialize, Serialize};

use crate::chemistry::StructureToolkit;

pub const INVALID_SMILES_MESSAGE: &str = "Error reading SMILES string, check again.";

const VIEWER_TEMPLATE: &str = r#"<html>
<head>
<title>3D Molecule Viewer</title>
<script src="https://code.jquery.com/jquery-3.6.3.min.js"></script>
<script src="https://cdnjs.cloudflare.com/ajax/libs/3Dmol/2.0.1/3Dmol.js"></script>
<style>
head, body {
    margin: 0;
    border: 0;
    padding: 0;
    max-height: 100vh
}
</style>
<script>
$(document).ready(function() {
    var viewer = $3Dmol.createViewer("viewer");
    viewer.setBackgroundColor(0xffffff);
    viewer.addModel(`{{ molecule }}`, "mol");
    viewer.setStyle({stick:{}});
    viewer.zoomTo();
    viewer.render();
});
</script>
</head>
<body>
    <div id="viewer" style="width: 100%; height: 100vh; margin: 0; padding: 0; border: 0;"></div>
</body>
</html>
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Enum, Serialize, Deserialize)]
pub enum Visualization {
    #[default]
    #[oai(rename = "2D")]
    #[serde(rename = "2D")]
    TwoD,
    #[oai(rename = "3D")]
    #[serde(rename = "3D")]
    ThreeD,
}

impl std::str::FromStr for Visualization {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "2D" => Ok(Visualization::TwoD),
            "3D" => Ok(Visualization::ThreeD),
            other => Err(format!("unknown visualization {other:?}, expected 2D or 3D")),
        }
    }
}

/// Renders `smiles` for display. Structures the toolkit cannot read depict
/// as a fixed error message rather than failing the request.
///
/// The 3D viewer is fed the same 2D MolBlock as the `2D` view. No conformer
/// is embedded or force-field optimized, so every atom sits at `z = 0` and
/// the molecule renders flat, only rotatable in the viewer.
pub fn depict(toolkit: &dyn StructureToolkit, smiles: &str, visualization: Visualization) -> String {
    let mol_block = match toolkit.mol_block(smiles) {
        Ok(mol_block) => mol_block,
        Err(e) => {
            log::debug!("could not depict {smiles:?}: {e}");
            return INVALID_SMILES_MESSAGE.to_string();
        }
    };

    match visualization {
        Visualization::TwoD => mol_block,
        Visualization::ThreeD => VIEWER_TEMPLATE.replace("{{ molecule }}", &mol_block),
    }
}
