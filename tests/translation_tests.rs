mod common;

use stout::errors::PipelineError;
use stout::translation::{split_batch, Converter};
use stout::verification::{
    ResultTable, TableOptions, VerificationStatus, FAILED_TO_RETRANSLATE,
};

#[test]
fn test_smiles_to_iupac() {
    let translator = common::build_translator();

    assert_eq!(translator.smiles_to_iupac("CCO").unwrap(), "ethanol");
    assert_eq!(translator.smiles_to_iupac("  CC(=O)O\n").unwrap(), "acetic acid");
}

#[test]
fn test_aromatic_smiles_is_encoded_in_kekule_form() {
    let translator = common::build_translator();
    let vocabulary = common::smiles_vocabulary();
    assert!(vocabulary.index_of("c").is_none());

    assert_eq!(translator.smiles_to_iupac("Oc1ccccc1").unwrap(), "phenol");
    assert_eq!(translator.smiles_to_iupac("C1=CC=C(O)C=C1").unwrap(), "phenol");
}

#[test]
fn test_smiles_to_iupac_is_deterministic() {
    let translator = common::build_translator();

    let first = translator.smiles_to_iupac("CCN").unwrap();
    let second = translator.smiles_to_iupac("CCN").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_invalid_smiles_is_rejected() {
    let translator = common::build_translator();

    let result = translator.smiles_to_iupac("C1CC(");
    assert!(matches!(result, Err(PipelineError::Parse { .. })));
}

#[test]
fn test_unknown_token_is_a_vocabulary_error() {
    let translator = common::build_translator();

    // S is valid chemistry but absent from the fake vocabulary
    let result = translator.smiles_to_iupac("CCS");
    assert!(matches!(result, Err(PipelineError::Vocabulary { ref token, .. }) if token == "S"));
}

#[test]
fn test_overlong_smiles_is_a_shape_error() {
    let translator = common::build_translator();

    let long_chain = "C".repeat(common::FORWARD_LENGTH);
    let result = translator.smiles_to_iupac(&long_chain);
    assert!(matches!(result, Err(PipelineError::Shape { .. })));
}

#[test]
fn test_iupac_to_smiles_with_both_converters() {
    let translator = common::build_translator();

    assert_eq!(
        translator.iupac_to_smiles("ethanol", Converter::Opsin).unwrap(),
        "OCC"
    );
    assert_eq!(
        translator
            .iupac_to_smiles("acetic acid", Converter::Stout)
            .unwrap(),
        "CC(O)=O"
    );
}

#[test]
fn test_iupac_to_smiles_unknown_name() {
    let translator = common::build_translator();

    let result = translator.iupac_to_smiles("unobtainium", Converter::Opsin);
    assert!(matches!(result, Err(PipelineError::Parse { .. })));
}

#[test]
fn test_image_to_smiles() {
    let translator = common::build_translator();

    let smiles = translator
        .image_to_smiles(&common::sample_png(100, 100))
        .unwrap();
    assert_eq!(smiles, common::RECOGNIZED_SMILES);
}

#[test]
fn test_image_to_smiles_rejects_garbage() {
    let translator = common::build_translator();

    let result = translator.image_to_smiles(b"definitely not an image");
    assert!(result.is_err());
}

#[test]
fn test_batch_preserves_order_and_reports_failures() {
    let translator = common::build_translator();
    let batch = split_batch("CCO\nC1CC(\n\nCCN\n");

    let results = translator.translate_batch(&batch, false);

    let inputs = results.iter().map(|r| r.input.as_str()).collect::<Vec<_>>();
    assert_eq!(inputs, vec!["CCO", "C1CC(", "CCN"]);
    assert_eq!(results[0].predicted, "ethanol");
    assert!(results[1].error.is_some());
    assert_eq!(results[2].predicted, "ethanamine");
    assert!(results.iter().all(|r| r.status.is_none()));
}

#[test]
fn test_batch_retranslation_statuses() {
    let translator = common::build_translator();
    let batch = vec![
        "CCO".to_string(),
        "CC(C)O".to_string(),
        "C1CCCCC1".to_string(),
        "CC(=O)O".to_string(),
    ];

    let results = translator.translate_batch(&batch, true);

    let statuses = results.iter().map(|r| r.status).collect::<Vec<_>>();
    assert_eq!(
        statuses,
        vec![
            Some(VerificationStatus::VerifiedSame),
            Some(VerificationStatus::VerifiedDifferent),
            Some(VerificationStatus::Unverifiable),
            Some(VerificationStatus::VerifiedSame),
        ]
    );
    assert_eq!(results[1].round_trip.as_deref(), Some("CCCO"));
    assert_eq!(results[2].round_trip.as_deref(), Some(FAILED_TO_RETRANSLATE));
}

#[test]
fn test_result_table_from_batch() {
    let translator = common::build_translator();
    let batch = vec!["CCO".to_string(), "C1CCCCC1".to_string()];
    let results = translator.translate_batch(&batch, true);

    let table = ResultTable::build(
        &results,
        TableOptions {
            retranslate: true,
            visualize: false,
        },
        translator.toolkit(),
    );

    assert_eq!(
        table.columns(),
        &[
            "Original SMILES",
            "Predicted IUPAC name",
            "Retranslation",
            "Retranslated SMILES"
        ]
    );
    assert_eq!(table.rows()[0], vec!["CCO", "ethanol", "same as input", "OCC"]);
    assert_eq!(
        table.rows()[1],
        vec!["C1CCCCC1", "cyclohexyne", "unable to assess", FAILED_TO_RETRANSLATE]
    );
}
