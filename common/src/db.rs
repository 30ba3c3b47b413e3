use crate::errors::*;
use crate::{Package, Status, Table};
use chrono::NaiveDate;
use std::fs::{self, File};
use std::io::{self, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

pub const HEADER: [&str; 5] = [
    "Name",
    "Status",
    "Build time (min)",
    "Built on",
    "Filename",
];

const DATE_FORMAT: &str = "%Y-%m-%d";
const DEFAULT_MODE: u32 = 0o644;

/// Flat `;`-separated file holding the status of every tracked package.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new<P: Into<PathBuf>>(path: P) -> Database {
        Database { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| anyhow!("Failed to create directory {:?}", parent))?;
            }
        }
        Ok(())
    }

    /// Create or truncate the database. No backup is done.
    pub fn init(&self) -> Result<()> {
        self.ensure_parent()?;
        File::create(&self.path)
            .with_context(|| anyhow!("Failed to truncate database {:?}", self.path))?;
        Ok(())
    }

    pub fn load(&self) -> Result<Table> {
        let buf = match fs::read(&self.path) {
            Ok(buf) => buf,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("Database {:?} does not exist yet", self.path);
                return Ok(Table::new());
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| anyhow!("Failed to read database {:?}", self.path))
            }
        };
        parse(&buf)
    }

    /// Replace the whole database with `table`, sorted by name.
    pub fn write(&self, table: &Table) -> Result<()> {
        self.ensure_parent()?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .context("Failed to create temporary database file")?;
        serialize(table, tmp.as_file_mut())?;
        tmp.as_file_mut().flush()?;

        // temp files are created 0600, keep the mode of the file we replace
        let perms = match fs::metadata(&self.path) {
            Ok(md) => md.permissions(),
            Err(_) => fs::Permissions::from_mode(DEFAULT_MODE),
        };
        tmp.as_file()
            .set_permissions(perms)
            .context("Failed to set permissions of temporary database file")?;
        tmp.persist(&self.path)
            .with_context(|| anyhow!("Failed to replace database {:?}", self.path))?;
        trace!("Wrote {} packages to {:?}", table.len(), self.path);
        Ok(())
    }

    /// Raw file content, empty if the database was never written.
    pub fn read_raw(&self) -> Result<Vec<u8>> {
        match fs::read(&self.path) {
            Ok(buf) => Ok(buf),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err).with_context(|| anyhow!("Failed to read database {:?}", self.path)),
        }
    }
}

fn non_empty(field: Option<&str>) -> Option<&str> {
    field.filter(|s| !s.is_empty())
}

fn parse_row(row: &csv::StringRecord) -> Result<Option<Package>> {
    let name = match non_empty(row.get(0)) {
        Some(name) => name.to_string(),
        None => return Ok(None),
    };

    let status = match non_empty(row.get(1)) {
        Some(status) => status.parse::<Status>().unwrap_or_else(|err| {
            warn!("{:?}: {:#}, treating as {}", name, err, Status::New);
            Status::New
        }),
        None => Status::New,
    };

    let build_time = non_empty(row.get(2)).and_then(|s| s.parse::<u64>().ok());

    let built_on = non_empty(row.get(3))
        .map(|s| NaiveDate::parse_from_str(s, DATE_FORMAT))
        .transpose()
        .with_context(|| anyhow!("Invalid build date for {:?}", name))?;

    let filename = non_empty(row.get(4)).map(PathBuf::from);

    Ok(Some(Package {
        name,
        status,
        build_time,
        built_on,
        filename,
    }))
}

pub fn parse(buf: &[u8]) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .from_reader(buf);

    let mut table = Table::new();
    for (idx, row) in reader.records().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                warn!("Skipping malformed row {}: {:#}", idx + 2, err);
                continue;
            }
        };
        match parse_row(&row) {
            Ok(Some(pkg)) => table.insert(pkg),
            Ok(None) => (),
            Err(err) => warn!("Skipping malformed row {}: {:#}", idx + 2, err),
        }
    }

    Ok(table)
}

pub fn serialize<W: Write>(table: &Table, w: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(w);
    writer.write_record(HEADER)?;

    for pkg in table.sorted() {
        let build_time = pkg.build_time.map(|t| t.to_string()).unwrap_or_default();
        let built_on = pkg
            .built_on
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default();
        let filename = pkg
            .filename
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();

        writer.write_record([
            pkg.name.as_str(),
            &*pkg.status,
            build_time.as_str(),
            built_on.as_str(),
            filename.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
