use std::{env, process::ExitCode, time::Instant};

use coco_caption_embed::{CocoCaptions, Corpus, Error, IdfTable, KeyedVectors, Result, embed_caption};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_CAPTIONS: &str = "./dat/captions_train2014.json";
const DEFAULT_VECTORS: &str = "./dat/glove.6B.50d.txt.w2v";

#[derive(Debug, Default)]
struct Args {
    captions: Option<String>,
    vectors: Option<String>,
    caption_id: Option<u64>,
    image_id: Option<u64>,
    text: Option<String>,
    parallel: bool,
    help: bool,
}

fn parse_args<I: Iterator<Item = String>>(mut args: I) -> Result<Args> {
    let mut out = Args::default();
    while let Some(a) = args.next() {
        match a.as_str() {
            "--captions" => out.captions = Some(value(&mut args, "--captions")?),
            "--vectors" => out.vectors = Some(value(&mut args, "--vectors")?),
            "--caption-id" => out.caption_id = Some(id(&value(&mut args, "--caption-id")?)?),
            "--image-id" => out.image_id = Some(id(&value(&mut args, "--image-id")?)?),
            "--text" => out.text = Some(value(&mut args, "--text")?),
            "--parallel" => out.parallel = true,
            "-h" | "--help" => out.help = true,
            other => return Err(Error::Usage(format!("unknown argument {other:?}"))),
        }
    }
    Ok(out)
}

fn value<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Result<String> {
    args.next().ok_or_else(|| Error::Usage(format!("{flag} requires a value")))
}

fn id(s: &str) -> Result<u64> {
    s.parse().map_err(|_| Error::Usage(format!("expected an integer id, got {s:?}")))
}

fn print_usage() {
    eprintln!("Usage: coco-caption-embed [--captions PATH] [--vectors PATH] [--caption-id ID] [--image-id ID] [--text \"TEXT\"] [--parallel]");
    eprintln!("Env: COCO_CAPTIONS_JSON (default {DEFAULT_CAPTIONS}), COCO_VECTORS (default {DEFAULT_VECTORS}), RUST_LOG");
    eprintln!("Absent lookups print None. Vectors are printed space separated on one line.");
}

fn print_vector(v: &[f32]) {
    let line = v.iter().map(|x| x.to_string()).collect::<Vec<_>>().join(" ");
    println!("{line}");
}

/// Whether vectors are needed; fails before the IDF build for an unknown `--caption-id`
fn embedding_requested(args: &Args, coco: &CocoCaptions) -> Result<bool> {
    if let Some(id) = args.caption_id {
        if coco.caption(id).is_none() {
            return Err(Error::UnknownCaption { id });
        }
    }
    Ok(args.caption_id.is_some() || args.text.is_some())
}

fn run(mut args: Args) -> Result<()> {
    let captions_path = args
        .captions
        .take()
        .or_else(|| env::var("COCO_CAPTIONS_JSON").ok())
        .unwrap_or_else(|| DEFAULT_CAPTIONS.to_string());
    let coco = CocoCaptions::open(&captions_path)?;

    if let Some(image_id) = args.image_id {
        println!("url\t{}", coco.image_url(image_id).unwrap_or("None"));
        let ids = coco.caption_ids(image_id);
        for (caption_id, caption) in ids.into_iter().zip(coco.captions(image_id)) {
            println!("{caption_id}\t{caption}");
        }
    }

    if let Some(caption_id) = args.caption_id {
        println!("caption\t{}", coco.caption(caption_id).unwrap_or("None"));
        match coco.image_id(caption_id) {
            Some(image_id) => println!("image_id\t{image_id}"),
            None => println!("image_id\tNone"),
        }
    }

    if !embedding_requested(&args, &coco)? {
        return Ok(());
    }

    let start = Instant::now();
    let all = coco.all_captions();
    let corpus = if args.parallel {
        Corpus::par_from_documents(&all)
    } else {
        Corpus::from_documents(&all)
    };
    let idf = IdfTable::from_corpus(&corpus);
    info!(
        docs = idf.doc_num(),
        vocab = idf.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "built idf table"
    );

    let vectors_path = args
        .vectors
        .or_else(|| env::var("COCO_VECTORS").ok())
        .unwrap_or_else(|| DEFAULT_VECTORS.to_string());
    let vectors: KeyedVectors<f32> = KeyedVectors::load_word2vec_format(&vectors_path)?;

    if let Some(caption_id) = args.caption_id {
        print_vector(&coco.caption_vector(caption_id, &idf, &vectors)?);
    }
    if let Some(text) = args.text {
        print_vector(&embed_caption(&text, &idf, &vectors)?);
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            error!("{e}");
            print_usage();
            return ExitCode::from(2);
        }
    };
    if args.help {
        print_usage();
        return ExitCode::SUCCESS;
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
