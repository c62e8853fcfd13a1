//! TUM trajectory format.
//!
//! One pose per row: `timestamp tx ty tz qx qy qz qw`. Fields are separated by
//! whitespace or commas; lines starting with `#` are comments. Rows must be
//! sorted by timestamp for the rest of the crate, which this reader checks
//! only through [`Trajectory::validate`] downstream.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, Trim, WriterBuilder};

use crate::core::{Pose3D, Trajectory};
use crate::error::{Error, Result};

/// Number of fields in a TUM row.
const TUM_FIELDS: usize = 8;

/// Header comment emitted by the writer.
const TUM_HEADER: &str = "# timestamp tx ty tz qx qy qz qw";

/// Load a TUM trajectory from a file.
pub fn load_tum(path: &Path) -> Result<Trajectory> {
    let file = File::open(path)?;
    let trajectory = read_tum(BufReader::new(file))?;
    log::debug!("Loaded {} poses from {}", trajectory.len(), path.display());
    Ok(trajectory)
}

/// Read a TUM trajectory from any reader.
pub fn read_tum<R: Read>(mut reader: R) -> Result<Trajectory> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .trim(Trim::All)
        .delimiter(detect_delimiter(&text))
        .from_reader(text.as_bytes());

    let mut poses = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());

        // Runs of spaces or tabs produce empty or compound fields.
        let fields: Vec<&str> = record.iter().flat_map(str::split_whitespace).collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() != TUM_FIELDS {
            return Err(Error::Parse(format!(
                "line {}: expected {} fields, found {}",
                line,
                TUM_FIELDS,
                fields.len()
            )));
        }

        let mut row = [0.0; TUM_FIELDS];
        for (value, field) in row.iter_mut().zip(&fields) {
            *value = field.parse().map_err(|e| {
                Error::Parse(format!("line {}: invalid number '{}': {}", line, field, e))
            })?;
        }

        let pose = Pose3D::from_tum_row(row)
            .map_err(|e| Error::Parse(format!("line {}: {}", line, e)))?;
        poses.push(pose);
    }

    Ok(Trajectory::from_poses(&poses))
}

/// Comma if the first data line contains one, otherwise space.
fn detect_delimiter(text: &str) -> u8 {
    let first_data_line = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'));
    match first_data_line {
        Some(line) if line.contains(',') => b',',
        _ => b' ',
    }
}

/// Save a trajectory as a space-delimited TUM file.
pub fn save_tum(trajectory: &Trajectory, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_tum(trajectory, BufWriter::new(file))?;
    log::debug!("Saved {} poses to {}", trajectory.len(), path.display());
    Ok(())
}

/// Write a trajectory as space-delimited TUM rows with a header comment.
pub fn write_tum<W: Write>(trajectory: &Trajectory, mut writer: W) -> Result<()> {
    writeln!(writer, "{}", TUM_HEADER)?;

    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .delimiter(b' ')
        .from_writer(writer);
    for pose in trajectory.poses() {
        let row = pose.to_tum_row();
        wtr.write_record(row.iter().map(|v| v.to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_read_space_delimited_with_comments() {
        let text = "# timestamp tx ty tz qx qy qz qw\n\
                    1.0 0.0 0.0 0.0 0 0 0 1\n\
                    \n\
                    2.0  1.0\t2.0 3.0 0 0 0 1\n";
        let traj = read_tum(text.as_bytes()).unwrap();
        assert_eq!(traj.len(), 2);
        assert_eq!(traj.timestamps(), &[1.0, 2.0]);
        assert_relative_eq!(traj.positions()[1].z, 3.0);
    }

    #[test]
    fn test_read_comma_delimited() {
        let text = "1.0,0,0,0,0,0,0,1\n2.0, 1, 0, 0, 0, 0, 0, 1\n";
        let traj = read_tum(text.as_bytes()).unwrap();
        assert_eq!(traj.len(), 2);
        assert_relative_eq!(traj.positions()[1].x, 1.0);
    }

    #[test]
    fn test_read_normalizes_quaternion() {
        let text = "0.0 0 0 0 0 0 0 2\n";
        let traj = read_tum(text.as_bytes()).unwrap();
        assert_relative_eq!(traj.orientations()[0].quaternion().w, 1.0);
    }

    #[test]
    fn test_read_reports_bad_row() {
        let text = "# header\n1.0 0 0 0 0 0 0 1\n2.0 0 0 0 0 0 1\n";
        let err = read_tum(text.as_bytes()).unwrap_err();
        match err {
            Error::Parse(msg) => {
                assert!(msg.starts_with("line "), "{}", msg);
                assert!(msg.contains("found 7"), "{}", msg);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_read_rejects_bad_number_and_zero_quaternion() {
        assert!(matches!(
            read_tum("1.0 a 0 0 0 0 0 1\n".as_bytes()),
            Err(Error::Parse(_))
        ));
        assert!(matches!(
            read_tum("1.0 0 0 0 0 0 0 0\n".as_bytes()),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_write_then_read_preserves_values() {
        let text = "0.5 1.25 -2.5 0.125 0 0 0.7071067811865476 0.7071067811865476\n\
                    1.5 1.5 -2.0 0.25 0 0 0 1\n";
        let traj = read_tum(text.as_bytes()).unwrap();

        let mut buf = Vec::new();
        write_tum(&traj, &mut buf).unwrap();
        let written = String::from_utf8(buf).unwrap();
        assert!(written.starts_with('#'));
        assert!(!written.contains(','));

        let back = read_tum(written.as_bytes()).unwrap();
        assert_eq!(back.timestamps(), traj.timestamps());
        for (a, b) in back.positions().iter().zip(traj.positions()) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
        assert_relative_eq!(
            back.orientations()[0].angle_to(&traj.orientations()[0]),
            0.0,
            epsilon = 1e-9
        );
    }
}
