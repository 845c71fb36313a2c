pub const GRNA_REPORT_DISPLAY_VERSION: &str = env!("GRNA_REPORT_DISPLAY_VERSION");
pub const GRNA_REPORT_BUILD_N: &str = env!("GRNA_REPORT_BUILD_N");

pub fn version_cli_text() -> String {
    format!(
        "grna-report {}\nBuild {}\nCRISPR gRNA report builder\nSchemas: {}, {}",
        GRNA_REPORT_DISPLAY_VERSION,
        GRNA_REPORT_BUILD_N,
        grna_protocol::REPORT_SCHEMA,
        grna_protocol::RANKED_VIEW_SCHEMA
    )
}
