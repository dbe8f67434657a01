use crate::prelude::*;
use rand::seq::SliceRandom;
use serde::de::DeserializeOwned;
use std::path::Path;

/// One training example: input vector and target vector.
pub type Example = (Array1<f64>, Array1<f64>);

/// Reads a headerless CSV file into raw string rows. Rows may differ in
/// length.
pub fn read_rows<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Reads a headerless CSV file into typed records, one serde deserialization
/// per row.
pub fn read_records<T, P>(path: P) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record?);
    }
    Ok(records)
}

/// Writes a header record followed by the data rows.
pub fn write_rows<P: AsRef<Path>>(path: P, headers: &[&str], rows: &[Vec<String>]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Shuffles the rows and splits them at `first_part` of the total, the usual
/// train/test split.
pub fn split_in_random<T, R: Rng>(
    mut rows: Vec<T>,
    first_part: f64,
    rng: &mut R,
) -> (Vec<T>, Vec<T>) {
    rows.shuffle(rng);
    let first_end = ((rows.len() as f64 * first_part) as usize).min(rows.len());
    let second = rows.split_off(first_end);
    (rows, second)
}

/// Maps each row through an input builder and a target builder, pairing the
/// results into examples.
pub fn build_examples<T, I, O>(rows: &[T], input_builder: I, output_builder: O) -> Vec<Example>
where
    I: Fn(&T) -> Array1<f64>,
    O: Fn(&T) -> Array1<f64>,
{
    rows.iter()
        .map(|row| (input_builder(row), output_builder(row)))
        .collect()
}

/// Pairs each input with a target computed from it, for training against a
/// known function.
pub fn examples_from_fn<F>(inputs: &[Array1<f64>], target: F) -> Vec<Example>
where
    F: Fn(&Array1<f64>) -> Array1<f64>,
{
    inputs
        .iter()
        .map(|input| (input.clone(), target(input)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn rows_round_trip_through_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        write_rows(
            &path,
            &["a", "b"],
            &[
                vec!["1".to_string(), "2".to_string()],
                vec!["3".to_string(), "4".to_string()],
            ],
        )
        .unwrap();
        let rows = read_rows(&path).unwrap();
        assert_eq!(rows[0], vec!["a", "b"]);
        assert_eq!(rows[1], vec!["1", "2"]);
        assert_eq!(rows[2], vec!["3", "4"]);
    }

    #[test]
    fn ragged_rows_are_kept_as_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ragged.csv");
        std::fs::write(&path, "1,2,3\n4,5\n").unwrap();
        let rows = read_rows(&path).unwrap();
        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[1].len(), 2);
    }

    #[test]
    fn typed_records_deserialize_fields_in_order() {
        #[derive(serde::Deserialize)]
        struct Point {
            x: f64,
            y: f64,
            label: String,
        }
        let dir = tempdir().unwrap();
        let path = dir.path().join("points.csv");
        std::fs::write(&path, "0.5,1.5,first\n-1.0,2.0,second\n").unwrap();
        let points: Vec<Point> = read_records(&path).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].x, 0.5);
        assert_eq!(points[0].y, 1.5);
        assert_eq!(points[1].label, "second");
    }

    #[test]
    fn split_keeps_every_row_across_both_parts() {
        let rows: Vec<u32> = (0..10).collect();
        let mut rng = StdRng::seed_from_u64(3);
        let (train, test) = split_in_random(rows, 0.7, &mut rng);
        assert_eq!(train.len(), 7);
        assert_eq!(test.len(), 3);
        let mut all: Vec<u32> = train.into_iter().chain(test).collect();
        all.sort_unstable();
        assert_eq!(all, (0..10).collect::<Vec<u32>>());
    }

    #[test]
    fn oversized_split_keeps_everything_in_the_first_part() {
        let rows: Vec<u32> = (0..4).collect();
        let mut rng = StdRng::seed_from_u64(3);
        let (train, test) = split_in_random(rows, 1.5, &mut rng);
        assert_eq!(train.len(), 4);
        assert!(test.is_empty());
    }

    #[test]
    fn examples_pair_inputs_with_built_targets() {
        let rows = vec![vec!["1.0".to_string(), "2.0".to_string()]];
        let examples = build_examples(
            &rows,
            |row| array![row[0].parse::<f64>().unwrap()],
            |row| array![row[1].parse::<f64>().unwrap()],
        );
        assert_eq!(examples[0].0, array![1.0]);
        assert_eq!(examples[0].1, array![2.0]);
    }

    #[test]
    fn function_targets_follow_their_inputs() {
        let inputs = vec![array![1.0], array![2.0]];
        let examples = examples_from_fn(&inputs, |input| input * 2.0);
        assert_eq!(examples[0].1, array![2.0]);
        assert_eq!(examples[1].1, array![4.0]);
    }
}
