use crate::RenderError;
use grna_protocol::{Candidate, ClassifiedCandidate, QualityTier, ReportDocument, Strand, TierColor};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// One line of the ranked table export. Scores keep full precision so
/// re-reading the table yields the values the report was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub rank: usize,
    pub sequence: String,
    pub pam: String,
    pub start: u64,
    pub strand: Strand,
    pub score: f64,
    pub quality: QualityTier,
    pub color: TierColor,
}

impl TableRow {
    pub fn candidate(&self) -> Candidate {
        Candidate {
            sequence: self.sequence.clone(),
            pam: self.pam.clone(),
            start: self.start,
            strand: self.strand,
            score: self.score,
        }
    }
}

impl From<&ClassifiedCandidate> for TableRow {
    fn from(row: &ClassifiedCandidate) -> Self {
        Self {
            rank: row.rank,
            sequence: row.candidate.sequence.clone(),
            pam: row.candidate.pam.clone(),
            start: row.candidate.start,
            strand: row.candidate.strand,
            score: row.candidate.score,
            quality: row.quality_tier,
            color: row.tier_color,
        }
    }
}

pub fn write_table_csv<W: Write>(doc: &ReportDocument, writer: W) -> Result<(), RenderError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in &doc.table {
        wtr.serialize(TableRow::from(row))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn render_table_csv(doc: &ReportDocument) -> Result<String, RenderError> {
    let mut buf = vec![];
    write_table_csv(doc, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn read_table_csv<R: Read>(reader: R) -> Result<Vec<TableRow>, RenderError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut ret = vec![];
    for row in rdr.deserialize() {
        ret.push(row?);
    }
    Ok(ret)
}
