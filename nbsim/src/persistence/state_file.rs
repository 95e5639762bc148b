//! Plain-text particle state files
//!
//! ```text
//! label, rx, ry, rz, vx, vy, vz, mass
//! -----------------------------------
//! p_1, 0, -125, 0, 0.5, 0, 0, 7
//! ```
//!
//! Two header lines, then one comma-space separated row per particle. Numbers
//! use the shortest decimal form that parses back to the same `f64`.
//! Loading is all-or-nothing: the first bad row fails the whole load.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::info;

use crate::error::{Result, SimError};
use crate::simulation::states::Particle;
use crate::simulation::vector::NVec3;

pub const HEADER: &str = "label, rx, ry, rz, vx, vy, vz, mass";

const FIELDS: usize = 8;

pub fn write_state<'a, W, I>(mut writer: W, particles: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Particle>,
{
    writeln!(writer, "{HEADER}")?;
    writeln!(writer, "{}", "-".repeat(HEADER.len()))?;
    for p in particles {
        let (r, v) = (p.position(), p.velocity());
        writeln!(
            writer,
            "{}, {}, {}, {}, {}, {}, {}, {}",
            p.label(),
            r.x,
            r.y,
            r.z,
            v.x,
            v.y,
            v.z,
            p.mass()
        )?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_state<R: Read>(reader: R) -> Result<Vec<Particle>> {
    let mut lines = BufReader::new(reader).lines();
    for n in 1..=2 {
        match lines.next() {
            Some(line) => {
                line?;
            }
            None => {
                return Err(SimError::Parse {
                    line: n,
                    reason: "missing header".to_string(),
                })
            }
        }
    }

    let mut particles = Vec::new();
    let mut seen = HashSet::new();
    for (k, line) in lines.enumerate() {
        let line_no = k + 3;
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let particle = parse_row(&line).map_err(|reason| SimError::Parse {
            line: line_no,
            reason,
        })?;
        if !seen.insert(particle.label().to_string()) {
            return Err(SimError::Parse {
                line: line_no,
                reason: format!("duplicate label `{}`", particle.label()),
            });
        }
        particles.push(particle);
    }
    Ok(particles)
}

fn parse_row(line: &str) -> std::result::Result<Particle, String> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != FIELDS {
        return Err(format!("expected {FIELDS} fields, found {}", fields.len()));
    }

    let mut values = [0.0; FIELDS - 1];
    for (value, field) in values.iter_mut().zip(&fields[1..]) {
        *value = field
            .parse::<f64>()
            .map_err(|e| format!("`{field}` is not a number: {e}"))?;
    }

    let [rx, ry, rz, vx, vy, vz, m] = values;
    Particle::new(fields[0], NVec3::new(rx, ry, rz), NVec3::new(vx, vy, vz), m)
        .map_err(|e| e.to_string())
}

pub fn save_state<'a, I>(path: &Path, particles: I) -> Result<()>
where
    I: IntoIterator<Item = &'a Particle>,
{
    let file = File::create(path)?;
    write_state(BufWriter::new(file), particles)?;
    info!("state saved to {}", path.display());
    Ok(())
}

pub fn load_state(path: &Path) -> Result<Vec<Particle>> {
    let particles = read_state(File::open(path)?)?;
    info!("{} particles loaded from {}", particles.len(), path.display());
    Ok(particles)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Particle> {
        vec![
            Particle::new("p_1", NVec3::new(0.0, -125.0, 0.0), NVec3::new(0.5, 0.0, 0.0), 7.0).unwrap(),
            Particle::new("p_2", NVec3::new(1.0 / 3.0, 2.5, -7.25), NVec3::new(-1.2, 0.1, 0.0), 1.4).unwrap(),
        ]
    }

    fn load(text: &str) -> Result<Vec<Particle>> {
        read_state(text.as_bytes())
    }

    #[test]
    fn header_and_row_layout() {
        let mut out = Vec::new();
        write_state(&mut out, &sample()[..1]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], HEADER);
        assert!(lines[1].chars().all(|c| c == '-'));
        assert_eq!(lines[2], "p_1, 0, -125, 0, 0.5, 0, 0, 7");
    }

    #[test]
    fn saved_state_loads_back() {
        let original = sample();
        let mut out = Vec::new();
        write_state(&mut out, &original).unwrap();
        let loaded = read_state(out.as_slice()).unwrap();

        assert_eq!(loaded.len(), original.len());
        for (a, b) in original.iter().zip(&loaded) {
            assert_eq!(a.label(), b.label());
            assert_eq!(a.position(), b.position());
            assert_eq!(a.velocity(), b.velocity());
            assert_eq!(a.mass(), b.mass());
        }
    }

    #[test]
    fn extreme_magnitudes_load_back() {
        let original = vec![
            Particle::new("sat", NVec3::new(1.0, 1e-300, -3e12), NVec3::new(2.5e-20, 0.0, 1e15), 7.5e-27).unwrap(),
            Particle::new("star a", NVec3::new(0.1, 0.2, 0.3), NVec3::zeros(), 1e30).unwrap(),
        ];
        let mut out = Vec::new();
        write_state(&mut out, &original).unwrap();
        let loaded = read_state(out.as_slice()).unwrap();

        for (a, b) in original.iter().zip(&loaded) {
            assert_eq!(a.label(), b.label());
            assert_eq!(a.position(), b.position());
            assert_eq!(a.velocity(), b.velocity());
            assert_eq!(a.mass(), b.mass());
        }
    }

    #[test]
    fn padded_labels_never_reach_a_file() {
        let err = Particle::new(" star a ", NVec3::zeros(), NVec3::zeros(), 1.0).unwrap_err();
        assert!(matches!(err, SimError::InvalidLabel(_)));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let loaded = load("h\n--\n\na, 0, 0, 0, 0, 0, 0, 1\n\n").unwrap();
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn missing_header() {
        let err = load("label, rx, ry, rz, vx, vy, vz, mass\n").unwrap_err();
        assert!(matches!(err, SimError::Parse { line: 2, .. }));
    }

    #[test]
    fn malformed_rows_fail_the_whole_load() {
        let cases = [
            "h\n--\na, 0, 0, 0, 0, 0, 0, 1\nb, 0, 0, 0, 0, 0, 1\n",
            "h\n--\na, 0, 0, 0, 0, 0, 0, 1\nb, 0, zero, 0, 0, 0, 0, 1\n",
            "h\n--\na, 0, 0, 0, 0, 0, 0, 1\nb, 0, 0, 0, 0, 0, 0, -1\n",
            "h\n--\na, 0, 0, 0, 0, 0, 0, 1\na, 5, 0, 0, 0, 0, 0, 1\n",
        ];
        for text in cases {
            let err = load(text).unwrap_err();
            assert!(matches!(err, SimError::Parse { line: 4, .. }), "{text:?} -> {err}");
        }
    }
}
