use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use actix_web::web::Bytes;
use futures_util::future::try_join_all;
use futures_util::stream::{self, Stream};
use log::{debug, info, warn};
use tokio::fs;
use uuid::Uuid;
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

use crate::export::markdown::{self, FileNamer};
use crate::post::post_model::Post;
use crate::utils::error::CustomError;

pub const ARCHIVE_NAME: &str = "posts.zip";
const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    Idle,
    Generating,
    Archiving,
    Streaming,
    CleaningUp,
    Done,
    Failed,
}

impl fmt::Display for ExportStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ExportStage::Idle => "idle",
            ExportStage::Generating => "generating",
            ExportStage::Archiving => "archiving",
            ExportStage::Streaming => "streaming",
            ExportStage::CleaningUp => "cleaning up",
            ExportStage::Done => "done",
            ExportStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Finished archive, held in memory once the working directory is gone.
#[derive(Debug, Clone)]
pub struct ExportArchive {
    pub bytes: Bytes,
    pub documents: usize,
}

impl ExportArchive {
    /// Body stream for the HTTP response, in fixed-size chunks.
    pub fn into_stream(self) -> impl Stream<Item = Result<Bytes, CustomError>> + 'static {
        let bytes = self.bytes;
        let chunks: Vec<Bytes> = (0..bytes.len())
            .step_by(CHUNK_SIZE)
            .map(|start| bytes.slice(start..(start + CHUNK_SIZE).min(bytes.len())))
            .collect();

        stream::iter(chunks.into_iter().map(Ok))
    }
}

/// Turns the post collection into a zip of markdown documents.
///
/// Every run works in its own directory under `root` and removes it before
/// returning, whatever the outcome.
pub struct ExportPipeline {
    root: PathBuf,
}

impl ExportPipeline {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ExportPipeline { root: root.into() }
    }

    pub async fn run(&self, posts: &[Post]) -> Result<ExportArchive, CustomError> {
        if posts.is_empty() {
            return Err(CustomError::NoContentError(
                "No posts available for export".into(),
            ));
        }

        let work_dir = self.root.join(Uuid::new_v4().to_string());
        let mut stage = ExportStage::Idle;

        let result = self.build(&work_dir, posts, &mut stage).await;
        if result.is_err() {
            debug!("Export failed while {}", stage);
        }

        advance(&mut stage, ExportStage::CleaningUp);
        cleanup(&work_dir).await;

        match result {
            Ok(archive) => {
                advance(&mut stage, ExportStage::Done);
                info!("Exported {} posts", archive.documents);
                Ok(archive)
            }
            Err(e) => {
                advance(&mut stage, ExportStage::Failed);
                Err(e)
            }
        }
    }

    async fn build(
        &self,
        work_dir: &Path,
        posts: &[Post],
        stage: &mut ExportStage,
    ) -> Result<ExportArchive, CustomError> {
        advance(stage, ExportStage::Generating);
        let files = generate(work_dir, posts).await?;

        advance(stage, ExportStage::Archiving);
        let archive_path = work_dir.join(ARCHIVE_NAME);
        let dir = work_dir.to_path_buf();
        let target = archive_path.clone();
        let names = files.clone();
        tokio::task::spawn_blocking(move || write_archive(&dir, &names, &target))
            .await
            .map_err(|e| CustomError::ExportGenerationError(e.to_string()))?
            .map_err(|e| CustomError::ExportGenerationError(format!("archive: {}", e)))?;

        advance(stage, ExportStage::Streaming);
        let bytes = fs::read(&archive_path)
            .await
            .map_err(|e| CustomError::ExportStreamError(format!("{}: {}", archive_path.display(), e)))?;

        Ok(ExportArchive {
            bytes: Bytes::from(bytes),
            documents: files.len(),
        })
    }
}

fn advance(stage: &mut ExportStage, next: ExportStage) {
    debug!("Export stage {} -> {}", stage, next);
    *stage = next;
}

/// Writes one markdown file per post and returns the file names.
async fn generate(work_dir: &Path, posts: &[Post]) -> Result<Vec<String>, CustomError> {
    fs::create_dir_all(work_dir)
        .await
        .map_err(|e| CustomError::ExportGenerationError(format!("{}: {}", work_dir.display(), e)))?;

    let mut namer = FileNamer::new();
    let documents: Vec<(String, String)> = posts
        .iter()
        .map(|post| (namer.name_for(post), markdown::render(post)))
        .collect();

    let writes = documents.iter().map(|(name, body)| {
        let path = work_dir.join(name);
        async move {
            fs::write(&path, body).await.map_err(|e| {
                CustomError::ExportGenerationError(format!("{}: {}", path.display(), e))
            })
        }
    });
    try_join_all(writes).await?;

    Ok(documents.into_iter().map(|(name, _)| name).collect())
}

fn write_archive(dir: &Path, names: &[String], target: &Path) -> zip::result::ZipResult<()> {
    let mut zip = ZipWriter::new(File::create(target)?);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(9));

    for name in names {
        zip.start_file(name.as_str(), options)?;
        let mut file = File::open(dir.join(name))?;
        io::copy(&mut file, &mut zip)?;
    }

    zip.finish()?;
    Ok(())
}

async fn cleanup(work_dir: &Path) {
    match fs::remove_dir_all(work_dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove export directory {}: {}", work_dir.display(), e),
    }
}
