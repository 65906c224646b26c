use anyhow::Result;
use tempfile::TempDir;
use tfa_recon::{CliConfig, LocalStorage, ReconEngine, TfaPipeline, TomlConfig};

const REFERENCE: &str = "bHLH,PF00010\nHomeobox,PF00046\nCUT,PF02376\nCUT,PF00046\n";

const DIAMOND: &str = "\
seq_otx\t250\tsp|P1\t260\tsp|P1 Homeobox protein OTX2 OS=Homo sapiens OX=9606\t91.5\t240\t20\t1\t5\t245\t3\t243\t96\t1e-80\t450
seq_myod\t320\tsp|P2\t318\tsp|P2 Myoblast determination protein 1, isoform A OS=Mus musculus\t77\t300\t60\t2\t1\t300\t1\t300\t94\t3e-55\t390
seq_tn\t500\tsp|P3\t480\tsp|P3 Putative transposase OS=Drosophila melanogaster\t45\t400\t200\t10\t20\t420\t10\t410\t80\t1e-12\t120
";

const IPS: &str = "\
seq_otx\tm1\t250\tPfam\tPF03529\tOtx1 transcription factor\t150\t240\t1e-10\tT\t01-01-2025\tIPR003025\tOtx TF
seq_otx\tm1\t250\tPfam\tPF00046\tHomeodomain\t38\t95\t1e-20\tT\t01-01-2025\tIPR001356\tHomeobox domain
seq_myod\tm2\t320\tPfam\tPF00010\tHelix-loop-helix DNA-binding domain\t110\t160\t1e-15\tT\t01-01-2025\tIPR011598\tMyc-type bHLH
seq_tn\tm3\t500\tPfam\tPF00010\tHelix-loop-helix DNA-binding domain\t10\t60\t1e-9\tT\t01-01-2025\tIPR011598\tMyc-type bHLH
seq_tn\tm3\t500\tPfam\tPF01609\tTransposase IS4\t100\t400\t1e-30\tT\t01-01-2025\tIPR002559\tTransposase IS4
";

const DEEPTF: &str = "sequence_ID\tprediction\tscore
seq_otx\tTrue\t0.97
seq_myod\tTrue\t0.88
seq_tn\tTrue\t0.95
seq_ml\tTrue\t0.9
seq_low\tFalse\t0.1
";

fn write_inputs(dir: &TempDir) -> Result<()> {
    std::fs::write(dir.path().join("TFsdomains.csv"), REFERENCE)?;
    std::fs::write(dir.path().join("sample.atfdb.1e3.txt"), DIAMOND)?;
    std::fs::write(dir.path().join("sample.ips_results.tsv"), IPS)?;
    std::fs::write(dir.path().join("prediction_result.txt"), DEEPTF)?;
    Ok(())
}

fn cli_config(dir: &TempDir, supplementary: bool) -> CliConfig {
    let base = dir.path().to_str().unwrap().to_string();
    CliConfig {
        reference: format!("{}/TFsdomains.csv", base),
        homology: format!("{}/sample.atfdb.1e3.txt", base),
        domain_scan: format!("{}/sample.ips_results.tsv", base),
        predictions: format!("{}/prediction_result.txt", base),
        output_dir: format!("{}/out", base),
        output_prefix: "sample".to_string(),
        score_threshold: 0.5,
        exclusion_term: "transposase".to_string(),
        missing_marker: "NA".to_string(),
        supplementary,
        verbose: false,
        monitor: false,
        json_logs: false,
    }
}

#[tokio::test]
async fn test_end_to_end_reconciliation() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_inputs(&temp_dir)?;

    let pipeline = TfaPipeline::new(LocalStorage::current_dir(), cli_config(&temp_dir, false));
    let engine = ReconEngine::new(pipeline);
    let output_path = engine.run().await?;

    assert!(output_path.ends_with("sample.tfa_results.csv"));
    let csv = std::fs::read_to_string(&output_path)?;
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(
        lines[0],
        "qseqid,prediction,score,salltitles,pident,qcovhsp,evalue,domain,description,start,end,family_keys"
    );
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[1],
        "seq_myod,True,0.88,\"Myoblast determination protein 1, isoform A\",77,94,3e-55,PF00010,Helix-loop-helix DNA-binding domain,110,160,bHLH"
    );
    assert_eq!(
        lines[2],
        "seq_otx,True,0.97,Homeobox protein OTX2,91.5,96,1e-80,PF00046; PF03529,Homeodomain; Otx1 transcription factor,38; 150,95; 240,TF_Otx"
    );

    let summary: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(
        temp_dir.path().join("out/sample.tfa_summary.json"),
    )?)?;
    let remaining: Vec<u64> = summary["checkpoints"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["remaining"].as_u64().unwrap())
        .collect();
    // 合併 5 → 分數 4 → 排除 transposase 3 → 有 family 2
    assert_eq!(remaining, vec![5, 4, 3, 2]);
    assert_eq!(summary["output_rows"], 2);

    Ok(())
}

#[tokio::test]
async fn test_supplementary_tables_written() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_inputs(&temp_dir)?;

    let pipeline = TfaPipeline::new(LocalStorage::current_dir(), cli_config(&temp_dir, true));
    ReconEngine::new(pipeline).run().await?;

    let out = temp_dir.path().join("out");
    let prediction_only = std::fs::read_to_string(out.join("sample.no_homologytfs.csv"))?;
    assert_eq!(prediction_only, "qseqid,prediction,score\nseq_ml,True,0.9\n");

    let calls = std::fs::read_to_string(out.join("sample.homologytfs.csv"))?;
    let ids: Vec<&str> = calls
        .lines()
        .skip(1)
        .map(|l| l.split(',').next().unwrap())
        .collect();
    assert_eq!(ids, vec!["seq_myod", "seq_otx", "seq_tn"]);

    Ok(())
}

#[tokio::test]
async fn test_missing_column_fails_before_output() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_inputs(&temp_dir)?;
    std::fs::write(
        temp_dir.path().join("prediction_result.txt"),
        "sequence_ID\tprediction\nseq_otx\tTrue\n",
    )?;

    let pipeline = TfaPipeline::new(LocalStorage::current_dir(), cli_config(&temp_dir, false));
    let err = ReconEngine::new(pipeline).run().await.unwrap_err();

    assert_eq!(err.stage(), "normalize");
    assert!(err.to_string().contains("score"));
    assert!(!temp_dir.path().join("out/sample.tfa_results.csv").exists());
    Ok(())
}

#[tokio::test]
async fn test_malformed_reference_aborts_run() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_inputs(&temp_dir)?;
    std::fs::write(temp_dir.path().join("TFsdomains.csv"), "bHLH,PF00010\nHomeobox,\n")?;

    let pipeline = TfaPipeline::new(LocalStorage::current_dir(), cli_config(&temp_dir, false));
    let err = ReconEngine::new(pipeline).run().await.unwrap_err();

    assert_eq!(err.stage(), "reference");
    assert_eq!(err.exit_code(), 1);
    assert!(!temp_dir.path().join("out").exists());
    Ok(())
}

#[tokio::test]
async fn test_toml_config_drives_pipeline() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_inputs(&temp_dir)?;
    let base = temp_dir.path().to_str().unwrap().replace('\\', "/");

    let config = TomlConfig::from_toml_str(&format!(
        r#"
[run]
name = "integration"

[inputs]
reference = "{base}/TFsdomains.csv"
homology = "{base}/sample.atfdb.1e3.txt"
domain_scan = "{base}/sample.ips_results.tsv"
predictions = "{base}/prediction_result.txt"

[filters]
score_threshold = 0.9

[output]
directory = "{base}/toml-out"
prefix = "strict"
missing_marker = "-"
"#
    ))?;

    let pipeline = TfaPipeline::new(LocalStorage::current_dir(), config);
    let output_path = ReconEngine::new(pipeline).run().await?;

    let csv = std::fs::read_to_string(output_path)?;
    let ids: Vec<&str> = csv
        .lines()
        .skip(1)
        .map(|l| l.split(',').next().unwrap())
        .collect();
    // seq_myod 的 0.88 低於 0.9
    assert_eq!(ids, vec!["seq_otx"]);
    Ok(())
}
