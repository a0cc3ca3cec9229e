// Example: streaming a larger instance bin by bin and item by item
//
// Twelve parcels are packed into a fleet of vans of three sizes. The client
// sends the options first, then every van, then every parcel.

use futures::stream;
use tonic::Request;

pub mod bin_packing {
    tonic::include_proto!("bin_packing");
}

use bin_packing::{
    bin_packing_solver_client::BinPackingSolverClient, pack_chunk::Chunk,
    solver_options::SolverBackend, Bin, Item, PackChunk, SolverOptions,
};

const VANS: [(&str, u64, u64); 6] = [
    ("small-1", 40, 60),
    ("small-2", 40, 60),
    ("medium-1", 70, 90),
    ("medium-2", 70, 90),
    ("large-1", 110, 150),
    ("large-2", 110, 150),
];

const PARCELS: [u64; 12] = [22, 17, 31, 9, 14, 26, 11, 8, 19, 27, 6, 13];

fn create_chunks() -> Vec<PackChunk> {
    let options = std::iter::once(Chunk::Options(SolverOptions {
        solver: SolverBackend::Highs as i32,
        time_limit: 30.0,
    }));
    let vans = VANS.iter().map(|&(id, volume_capacity, cost)| {
        Chunk::Bin(Bin {
            id: id.to_string(),
            volume_capacity,
            cost,
        })
    });
    let parcels = PARCELS.iter().enumerate().map(|(i, &volume)| {
        Chunk::Item(Item {
            id: format!("parcel-{:02}", i + 1),
            volume,
        })
    });

    options
        .chain(vans)
        .chain(parcels)
        .map(|chunk| PackChunk { chunk: Some(chunk) })
        .collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut client = BinPackingSolverClient::connect("http://127.0.0.1:50051").await?;

    let chunks = create_chunks();
    println!("Sending {} chunks...\n", chunks.len());

    let result = client
        .pack_stream(Request::new(stream::iter(chunks)))
        .await?
        .into_inner();

    println!(
        "{} van(s) used, total cost {}, {} of {} volume filled\n",
        result.bin_count, result.total_cost, result.used_volume, result.total_volume
    );
    for packed in &result.bins {
        let Some(van) = &packed.bin else { continue };
        let load: u64 = packed.items.iter().map(|item| item.volume).sum();
        println!("  {} ({}/{}):", van.id, load, van.volume_capacity);
        for parcel in &packed.items {
            println!("    {} - {}", parcel.id, parcel.volume);
        }
    }

    Ok(())
}
