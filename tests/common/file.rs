use derive_new::new;
use filetime::{FileTime, set_file_mtime};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct FileSpec {
    pub path: PathBuf,
    pub content: String,
}

pub fn write_file(file_spec: FileSpec) {
    if let Some(parent) = file_spec.path.parent() {
        std::fs::create_dir_all(parent)
            .unwrap_or_else(|e| panic!("Failed to create directory {:?}: {}", parent, e));
    }

    std::fs::write(&file_spec.path, &file_spec.content)
        .unwrap_or_else(|e| panic!("Failed to write file {:?}: {}", file_spec.path, e));
}

/// Pin the modification time so both sites agree to the second.
pub fn set_mtime(path: &Path, seconds: i64, nanos: u32) {
    set_file_mtime(path, FileTime::from_unix_time(seconds, nanos))
        .unwrap_or_else(|e| panic!("Failed to set mtime of {:?}: {}", path, e));
}

/// Write the same file, with the same mtime, into every given site root.
pub fn write_mirrored(roots: &[&Path], relative: &str, content: &str, mtime: i64) {
    for root in roots {
        let path = root.join(relative);
        write_file(FileSpec::new(path.clone(), content.to_string()));
        set_mtime(&path, mtime, 0);
    }
}

pub fn write_generated_files(dir: &Path, files_count: usize, extension: &str) -> Vec<FileSpec> {
    use fake::{
        Fake,
        faker::lorem::en::{Word, Words},
    };

    (0..files_count)
        .map(|idx| {
            let file_name = format!("{}-{idx}.{extension}", Word().fake::<String>());
            let file_content = Words(5..10).fake::<Vec<String>>().join(" ");

            let file_spec = FileSpec::new(dir.join(file_name), file_content);
            write_file(file_spec.clone());

            file_spec
        })
        .collect::<Vec<_>>()
}
