use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Metric, MetadataValue, PlayerDataset, PlayerSeasonRecord, Position};

/// Identifier columns removed on load; they carry nothing worth showing.
pub const DROPPED_COLUMNS: [&str; 6] = [
    "league_id",
    "team_id",
    "player_id",
    "season_id",
    "season",
    "position",
];

const TEXT_COLUMNS: [&str; 4] = ["player", "team", "league", "primary_position"];

/// A parsed row before interpretation: column_name → cell.
type Cells = BTreeMap<String, MetadataValue>;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a player-season dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – one row per player-season (recommended)
/// * `.json`    – `[{ "player": "...", "minutes": 900, ... }, ...]`
/// * `.csv`     – header row with the same column names
pub fn load_file(path: &Path) -> Result<PlayerDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} player-seasons across {} leagues from {}",
        dataset.len(),
        dataset.leagues.len(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Row interpretation (shared by every format)
// ---------------------------------------------------------------------------

fn required_columns() -> impl Iterator<Item = &'static str> {
    TEXT_COLUMNS
        .into_iter()
        .chain(Metric::ALL.into_iter().map(|m| m.column()))
}

fn is_core_column(name: &str) -> bool {
    required_columns().any(|c| c == name)
}

/// Verify every required column is present and return the extra columns, in file order.
fn check_columns(headers: &[String]) -> Result<Vec<String>> {
    for col in required_columns() {
        if !headers.iter().any(|h| h == col) {
            bail!("missing required column '{col}'");
        }
    }
    Ok(headers
        .iter()
        .filter(|h| !is_core_column(h) && !DROPPED_COLUMNS.contains(&h.as_str()))
        .cloned()
        .collect())
}

/// Accumulates records and reports unrecognised positions once at the end.
struct DatasetBuilder {
    extra_columns: Vec<String>,
    records: Vec<PlayerSeasonRecord>,
    unknown_positions: usize,
}

impl DatasetBuilder {
    fn new(headers: &[String]) -> Result<Self> {
        Ok(Self {
            extra_columns: check_columns(headers)?,
            records: Vec::new(),
            unknown_positions: 0,
        })
    }

    fn push(&mut self, row: usize, mut cells: Cells) -> Result<()> {
        let primary_position = match cells.remove("primary_position") {
            Some(MetadataValue::Null) | None => None,
            Some(value) => {
                let parsed = value.to_string().parse::<Position>().ok();
                if parsed.is_none() {
                    self.unknown_positions += 1;
                }
                parsed
            }
        };

        let record = PlayerSeasonRecord {
            player: take_text(&mut cells, "player"),
            team: take_text(&mut cells, "team"),
            league: take_text(&mut cells, "league"),
            primary_position,
            minutes: take_minutes(&mut cells, row)?,
            goals: take_metric(&mut cells, Metric::Goals, row)?,
            assists: take_metric(&mut cells, Metric::Assists, row)?,
            shots: take_metric(&mut cells, Metric::Shots, row)?,
            xg: take_metric(&mut cells, Metric::Xg, row)?,
            xa: take_metric(&mut cells, Metric::Xa, row)?,
            key_passes: take_metric(&mut cells, Metric::KeyPasses, row)?,
            extra: cells
                .into_iter()
                .filter(|(k, _)| self.extra_columns.contains(k))
                .collect(),
        };
        self.records.push(record);
        Ok(())
    }

    fn finish(self) -> PlayerDataset {
        if self.unknown_positions > 0 {
            log::warn!(
                "{} rows have an unrecognised primary_position; they only appear under 'All'",
                self.unknown_positions
            );
        }
        PlayerDataset::from_records(self.records, self.extra_columns)
    }
}

fn take_text(cells: &mut Cells, col: &str) -> String {
    match cells.remove(col) {
        Some(MetadataValue::String(s)) => s,
        Some(MetadataValue::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn take_minutes(cells: &mut Cells, row: usize) -> Result<u32> {
    match cells.remove("minutes") {
        Some(MetadataValue::Integer(i)) => Ok(i.clamp(0, i64::from(u32::MAX)) as u32),
        // Saturating float→int cast: NaN and negatives become 0.
        Some(MetadataValue::Float(f)) => Ok(f.round() as u32),
        Some(MetadataValue::Null) | None => Ok(0),
        Some(other) => bail!("Row {row}: minutes '{other}' is not a number"),
    }
}

fn take_metric(cells: &mut Cells, metric: Metric, row: usize) -> Result<f64> {
    match cells.remove(metric.column()) {
        Some(MetadataValue::Integer(i)) => Ok(i as f64),
        Some(MetadataValue::Float(f)) => Ok(f),
        Some(MetadataValue::Null) | None => Ok(f64::NAN),
        Some(other) => bail!("Row {row}: {metric} '{other}' is not a number"),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "player": "A. Example", "team": "FC", "league": "Serie A",
///     "primary_position": "F", "minutes": 2430, "goals": 11, "xg": 9.4, ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<PlayerDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<PlayerDataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
        rows.push(obj);
    }

    let mut builder = DatasetBuilder::new(&headers)?;
    for (i, obj) in rows.into_iter().enumerate() {
        let cells = obj
            .iter()
            .map(|(key, val)| (key.clone(), json_to_metadata(val)))
            .collect();
        builder.push(i, cells)?;
    }
    Ok(builder.finish())
}

fn json_to_metadata(val: &JsonValue) -> MetadataValue {
    match val {
        JsonValue::String(s) => MetadataValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                MetadataValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                MetadataValue::Float(f)
            } else {
                MetadataValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => MetadataValue::Bool(*b),
        JsonValue::Null => MetadataValue::Null,
        other => MetadataValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one player-season per line.
/// Empty cells are nulls.
fn load_csv(path: &Path) -> Result<PlayerDataset> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    read_csv(file)
}

fn read_csv<R: Read>(input: R) -> Result<PlayerDataset> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut builder = DatasetBuilder::new(&headers)?;

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cells = headers
            .iter()
            .zip(record.iter())
            .map(|(col, value)| (col.clone(), guess_metadata_type(value)))
            .collect();
        builder.push(row_no, cells)?;
    }

    Ok(builder.finish())
}

fn guess_metadata_type(s: &str) -> MetadataValue {
    if s.is_empty() {
        return MetadataValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return MetadataValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return MetadataValue::Float(f);
    }
    if s == "true" || s == "false" {
        return MetadataValue::Bool(s == "true");
    }
    MetadataValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of player-season rows.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`): categorical / large / view string
/// columns and narrow integer or float columns are normalised with Arrow's
/// `cast` kernel before reading.
fn load_parquet(path: &Path) -> Result<PlayerDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut dataset = DatasetBuilder::new(&headers)?;
    let mut row_offset = 0;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let columns: Vec<(String, ArrayRef)> = schema
            .fields()
            .iter()
            .zip(batch.columns())
            .filter(|(f, _)| !DROPPED_COLUMNS.contains(&f.name().as_str()))
            .map(|(f, col)| {
                normalize_column(col)
                    .with_context(|| format!("column '{}'", f.name()))
                    .map(|col| (f.name().clone(), col))
            })
            .collect::<Result<_>>()?;

        for row in 0..batch.num_rows() {
            let cells = columns
                .iter()
                .map(|(name, col)| (name.clone(), extract_metadata_value(col, row)))
                .collect();
            dataset.push(row_offset + row, cells)?;
        }
        row_offset += batch.num_rows();
    }

    Ok(dataset.finish())
}

// -- Parquet / Arrow helpers --

/// Widen a column to one of Utf8 / Int64 / Float64.
///
/// UInt64 and decimals have no lossless Int64 form and go to Float64, which
/// is exact for any realistic minutes or stat value.
fn normalize_column(col: &ArrayRef) -> Result<ArrayRef> {
    let target = match col.data_type() {
        DataType::LargeUtf8 | DataType::Utf8View | DataType::Dictionary(_, _) => DataType::Utf8,
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32 => DataType::Int64,
        DataType::Float16
        | DataType::Float32
        | DataType::UInt64
        | DataType::Decimal128(_, _)
        | DataType::Decimal256(_, _) => DataType::Float64,
        _ => return Ok(col.clone()),
    };
    Ok(cast(col, &target)?)
}

/// Extract a single cell from a normalised Arrow column at a given row.
fn extract_metadata_value(col: &ArrayRef, row: usize) -> MetadataValue {
    if col.is_null(row) {
        return MetadataValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => MetadataValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::Int64 => MetadataValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float64 => MetadataValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => MetadataValue::Bool(col.as_boolean().value(row)),
        // Dates, timestamps, decimals, ...: keep Arrow's display text.
        _ => MetadataValue::String(array_value_to_string(col, row).unwrap_or_default()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use std::path::PathBuf;

    use arrow::array::{
        Decimal128Array, DictionaryArray, Float64Array, Int32Array, Int64Array, StringArray,
        UInt64Array,
    };
    use arrow::datatypes::{Field, Int32Type, Schema, SchemaRef};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    /// Parquet file in the temp dir, removed on drop even when the test panics.
    struct TempParquet {
        path: PathBuf,
    }

    impl TempParquet {
        fn write(name: &str, schema: SchemaRef, batch: &RecordBatch) -> Self {
            let path = std::env::temp_dir().join(format!(
                "player_scout_{name}_{}.parquet",
                std::process::id()
            ));
            let tmp = TempParquet { path };
            let file = std::fs::File::create(&tmp.path).unwrap();
            let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
            writer.write(batch).unwrap();
            writer.close().unwrap();
            tmp
        }
    }

    impl Drop for TempParquet {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.path);
        }
    }

    const CSV: &str = "\
player_id,player,team,league,primary_position,position,minutes,goals,assists,shots,xg,xa,key_passes,age
1,Ana,Roma,Serie A,F,ST,2430,11,3,60,9.4,2.1,30,24
2,Ben,Lyon,Ligue 1,M,CM,1200,2,5,20,1.8,4.2,55,
3,Cal,Getafe,La Liga,,RB,0,,0,0,0.0,0.1,1,31
";

    #[test]
    fn test_csv_rows_and_dropped_columns() {
        let ds = read_csv(CSV.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.extra_columns, ["age"]);

        let ana = &ds.records[0];
        assert_eq!(ana.player, "Ana");
        assert_eq!(ana.primary_position, Some(Position::F));
        assert_eq!(ana.minutes, 2430);
        assert_eq!(ana.goals, 11.0);
        assert_eq!(ana.xg, 9.4);
        assert_eq!(ana.extra.get("age"), Some(&MetadataValue::Integer(24)));
        assert!(!ana.extra.contains_key("player_id"));
        assert!(!ana.extra.contains_key("position"));

        assert_eq!(ds.records[1].extra.get("age"), Some(&MetadataValue::Null));
    }

    #[test]
    fn test_csv_nulls() {
        let ds = read_csv(CSV.as_bytes()).unwrap();
        let cal = &ds.records[2];
        assert_eq!(cal.primary_position, None);
        assert!(cal.goals.is_nan());
        assert_eq!(cal.minutes, 0);
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "player,team,league,primary_position,minutes\nAna,Roma,Serie A,F,90\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("missing required column 'goals'"));
    }

    #[test]
    fn test_non_numeric_metric_is_an_error() {
        let csv = "player,team,league,primary_position,minutes,goals,assists,shots,xg,xa,key_passes\n\
                   Ana,Roma,Serie A,F,90,many,0,0,0,0,0\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("goals 'many' is not a number"));
    }

    #[test]
    fn test_json_records() {
        let json = r#"[
            {"player": "Ana", "team": "Roma", "league": "Serie A", "primary_position": "F",
             "minutes": 2430, "goals": 11, "assists": 3, "shots": 60, "xg": 9.4, "xa": 2.1,
             "key_passes": 30, "season": "2024/2025", "foot": "left"},
            {"player": "Dee", "team": "Betis", "league": "La Liga", "primary_position": "GK",
             "minutes": -5, "goals": null, "assists": 0, "shots": 0, "xg": 0.0, "xa": 0.0,
             "key_passes": 0}
        ]"#;
        let ds = parse_json(json).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.extra_columns, ["foot"]);
        assert_eq!(
            ds.records[0].extra.get("foot"),
            Some(&MetadataValue::String("left".into()))
        );
        assert_eq!(ds.records[1].primary_position, Some(Position::GK));
        assert_eq!(ds.records[1].minutes, 0);
        assert!(ds.records[1].goals.is_nan());
        assert_eq!(ds.leagues.len(), 2);
    }

    #[test]
    fn test_json_must_be_array() {
        assert!(parse_json(r#"{"player": "Ana"}"#).is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_file(Path::new("players.xlsx")).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }

    #[test]
    fn test_parquet_roundtrip_with_categorical_position() {
        let positions: DictionaryArray<Int32Type> = vec!["F", "GK", "X"].into_iter().collect();
        let schema = Arc::new(Schema::new(vec![
            Field::new("player_id", DataType::Int64, false),
            Field::new("player", DataType::Utf8, false),
            Field::new("team", DataType::Utf8, false),
            Field::new("league", DataType::Utf8, false),
            Field::new(
                "primary_position",
                DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8)),
                false,
            ),
            Field::new("minutes", DataType::Int32, false),
            Field::new("goals", DataType::Int64, false),
            Field::new("assists", DataType::Int64, false),
            Field::new("shots", DataType::Int64, false),
            Field::new("xg", DataType::Float64, true),
            Field::new("xa", DataType::Float64, false),
            Field::new("key_passes", DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![1, 2, 3])),
                Arc::new(StringArray::from(vec!["Ana", "Dee", "Eli"])),
                Arc::new(StringArray::from(vec!["Roma", "Betis", "Lens"])),
                Arc::new(StringArray::from(vec!["Serie A", "La Liga", "Ligue 1"])),
                Arc::new(positions),
                Arc::new(Int32Array::from(vec![2430, 3420, 15])),
                Arc::new(Int64Array::from(vec![11, 0, 0])),
                Arc::new(Int64Array::from(vec![3, 0, 0])),
                Arc::new(Int64Array::from(vec![60, 0, 1])),
                Arc::new(Float64Array::from(vec![Some(9.4), Some(0.0), None])),
                Arc::new(Float64Array::from(vec![2.1, 0.0, 0.0])),
                Arc::new(Int64Array::from(vec![30, 2, 0])),
            ],
        )
        .unwrap();

        let tmp = TempParquet::write("categorical", schema, &batch);
        let ds = load_file(&tmp.path).unwrap();

        assert_eq!(ds.len(), 3);
        assert!(ds.extra_columns.is_empty());
        assert_eq!(ds.records[0].primary_position, Some(Position::F));
        assert_eq!(ds.records[0].minutes, 2430);
        assert_eq!(ds.records[0].xg, 9.4);
        assert_eq!(ds.records[1].primary_position, Some(Position::GK));
        assert_eq!(ds.records[2].primary_position, None);
        assert!(ds.records[2].xg.is_nan());
        assert_eq!(ds.records[2].shots, 1.0);
    }

    #[test]
    fn test_parquet_unsigned_minutes_and_decimal_metric() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("player", DataType::Utf8, false),
            Field::new("team", DataType::Utf8, false),
            Field::new("league", DataType::Utf8, false),
            Field::new("primary_position", DataType::Utf8, true),
            Field::new("minutes", DataType::UInt64, false),
            Field::new("goals", DataType::UInt64, false),
            Field::new("assists", DataType::Int64, false),
            Field::new("shots", DataType::Int64, false),
            Field::new("xg", DataType::Decimal128(5, 2), true),
            Field::new("xa", DataType::Float64, false),
            Field::new("key_passes", DataType::Int64, false),
        ]));
        let xg = Decimal128Array::from(vec![Some(940i128), None])
            .with_precision_and_scale(5, 2)
            .unwrap();
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Ana", "Ben"])),
                Arc::new(StringArray::from(vec!["Roma", "Lyon"])),
                Arc::new(StringArray::from(vec!["Serie A", "Ligue 1"])),
                Arc::new(StringArray::from(vec![Some("F"), None])),
                Arc::new(UInt64Array::from(vec![2430u64, 90])),
                Arc::new(UInt64Array::from(vec![11u64, 0])),
                Arc::new(Int64Array::from(vec![3, 0])),
                Arc::new(Int64Array::from(vec![60, 2])),
                Arc::new(xg),
                Arc::new(Float64Array::from(vec![2.1, 0.3])),
                Arc::new(Int64Array::from(vec![30, 4])),
            ],
        )
        .unwrap();

        let tmp = TempParquet::write("unsigned_decimal", schema, &batch);
        let ds = load_file(&tmp.path).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].minutes, 2430);
        assert_eq!(ds.records[0].goals, 11.0);
        assert!((ds.records[0].xg - 9.4).abs() < 1e-9);
        assert_eq!(ds.records[1].minutes, 90);
        assert!(ds.records[1].xg.is_nan());
    }

    #[test]
    fn test_temp_parquet_is_removed_on_drop() {
        let schema = Arc::new(Schema::new(vec![Field::new("player", DataType::Utf8, false)]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![Arc::new(StringArray::from(vec!["Ana"]))],
        )
        .unwrap();
        let tmp = TempParquet::write("drop_check", schema, &batch);
        let path = tmp.path.clone();
        assert!(path.exists());
        drop(tmp);
        assert!(!path.exists());
    }
}
