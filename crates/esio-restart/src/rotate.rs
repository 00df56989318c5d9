//! Rotation: renaming a freshly written restart file into slot 0 of a
//! `#`-templated sequence, shifting every existing slot up by one and
//! dropping whatever falls off the end of `keep_howmany`.

use std::fs;
use std::path::Path;

use esio_core::{failed, invalid_argument, EsioResult};
use tracing::{info, instrument};

use crate::nextindex::nextindex;

/// Renames `src_path` into slot 0 of `dst_template` (a path containing a
/// single run of `#` characters marking the index field), first shifting
/// every existing matching file up by one slot in descending-index order so
/// no rename ever clobbers a file still needed. Entries whose shifted index
/// would reach or exceed `keep_howmany` are left in place (effectively
/// dropped, since nothing then points at them).
#[instrument(level = "debug", target = "esio::restart", skip(src_path))]
pub fn rotate(src_path: impl AsRef<Path>, dst_template: &str, keep_howmany: u32) -> EsioResult<()> {
    let src_path = src_path.as_ref();
    if keep_howmany < 1 {
        return Err(invalid_argument("keep_howmany < 1"));
    }
    fs::metadata(src_path).map_err(|e| failed(format!("cannot stat {src_path:?}: {e}")))?;

    let template_path = Path::new(dst_template);
    let dir = template_path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
    let basename = template_path
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| invalid_argument("dst_template has no file name component"))?;

    let hash_bytes = basename.as_bytes();
    let hash_start = hash_bytes
        .iter()
        .position(|&b| b == b'#')
        .ok_or_else(|| invalid_argument("dst_template must contain at least one '#'"))?;
    let mut hash_end = hash_start;
    while hash_end < hash_bytes.len() && hash_bytes[hash_end] == b'#' {
        hash_end += 1;
    }
    let template_ndigits = hash_end - hash_start;
    let prefix = &basename[..hash_start];
    let suffix = &basename[hash_end..];
    if suffix.contains('#') {
        return Err(invalid_argument("dst_template cannot contain multiple nonadjacent '#'s"));
    }

    let width_needed = if keep_howmany == 1 {
        1
    } else {
        ((keep_howmany - 1) as f64).log10().ceil() as usize
    };
    let ndigits = template_ndigits.max(width_needed);

    let mut pending: Vec<(i64, String)> = fs::read_dir(dir)
        .map_err(|e| failed(format!("reading directory {dir:?}: {e}")))?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter_map(|name| {
            let next = nextindex(basename, &name, -1);
            (next != 0).then_some((next, name))
        })
        .collect();
    // Highest target index first so a rename never overwrites a file that
    // still needs to move.
    pending.sort_by(|a, b| b.0.cmp(&a.0));

    for (next, name) in pending {
        if next <= 0 || next as u64 >= keep_howmany as u64 {
            continue;
        }
        let src = dir.join(&name);
        let dst = dir.join(format!("{prefix}{next:0ndigits$}{suffix}"));
        fs::rename(&src, &dst).map_err(|e| failed(format!("renaming {src:?} to {dst:?}: {e}")))?;
    }

    let final_dst = dir.join(format!("{prefix}{:0ndigits$}{suffix}", 0));
    fs::rename(src_path, &final_dst).map_err(|e| failed(format!("renaming {src_path:?} to {final_dst:?}: {e}")))?;
    info!(target: "esio::restart", dst = %final_dst.display(), "rotated restart file into slot 0");
    Ok(())
}
