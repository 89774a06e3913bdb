use std::fs::File;
use std::io;
use std::io::Write;
use std::path::Path;

const CONFIG_SAMPLE: &str = r#"# For the file locations, If you want it to be relative to the executable directory
# use ${exe_dir}/location
[storage]
folder = "BlogFiles"
extension = "xml"

# Remove this section to log to the console only
[log]
level = "Info"
log_to_console = false
location = "{{LOG_FILE}}"
"#;

pub(crate) fn write_sample_cfg(file_path: &Path, log_file: &Path) -> io::Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = File::create(file_path)?;
    file.write_all(get_sample_cfg(log_file).as_bytes())
}

fn get_sample_cfg(log_file: &Path) -> String {
    CONFIG_SAMPLE.replace("{{LOG_FILE}}", &log_file.display().to_string())
}
