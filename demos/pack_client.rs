// Example: packing a small move into boxes
//
// Bin        | Capacity | Cost
// -----------|----------|-----
// A          |    10    |  5
// B          |     5    |  1
//
// Items x (6) and y (4) both fit in A, so the server should answer with A
// alone: one bin beats two under the bin count penalty.
//
// Start the server first: cargo run --features server --bin packopt-server

use tonic::{Code, Request};

pub mod bin_packing {
    tonic::include_proto!("bin_packing");
}

use bin_packing::{
    bin_packing_solver_client::BinPackingSolverClient, solver_options::SolverBackend, Bin, Empty,
    Item, PackRequest, PackResult, SolverOptions,
};

fn print_result(result: &PackResult) {
    println!(
        "Solved by {}: {} bin(s), total cost {}, committed volume {} ({} used)",
        result.solver_backend,
        result.bin_count,
        result.total_cost,
        result.total_volume,
        result.used_volume
    );
    for packed in &result.bins {
        let Some(bin) = &packed.bin else { continue };
        let items: Vec<_> = packed
            .items
            .iter()
            .map(|item| format!("{} ({})", item.id, item.volume))
            .collect();
        println!("  {} [{}]: {}", bin.id, bin.volume_capacity, items.join(", "));
    }
    println!();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut client = BinPackingSolverClient::connect("http://127.0.0.1:50051").await?;

    let solvers = client
        .get_available_solvers(Request::new(Empty {}))
        .await?
        .into_inner()
        .solvers;
    println!("Available solvers:");
    for solver in &solvers {
        println!("  {} (v{})", solver.name, solver.version);
    }
    println!();

    let request = PackRequest {
        bins: vec![
            Bin {
                id: "A".to_string(),
                volume_capacity: 10,
                cost: 5,
            },
            Bin {
                id: "B".to_string(),
                volume_capacity: 5,
                cost: 1,
            },
        ],
        items: vec![
            Item {
                id: "x".to_string(),
                volume: 6,
            },
            Item {
                id: "y".to_string(),
                volume: 4,
            },
        ],
        options: Some(SolverOptions {
            solver: SolverBackend::CoinCbc as i32,
            time_limit: 0.0,
        }),
    };

    println!("=== Two items, two bins ===");
    let result = client.pack(Request::new(request.clone())).await?.into_inner();
    print_result(&result);

    println!("=== Too much to carry ===");
    let mut overloaded = request;
    overloaded.items.push(Item {
        id: "z".to_string(),
        volume: 9,
    });
    match client.pack(Request::new(overloaded)).await {
        Ok(response) => print_result(&response.into_inner()),
        Err(status) if status.code() == Code::FailedPrecondition => {
            println!("{}\n", status.message());
        }
        Err(status) => return Err(status.into()),
    }

    println!("=== Server's default instance ===");
    let result = client
        .pack_default_instance(Request::new(Empty {}))
        .await?
        .into_inner();
    print_result(&result);

    Ok(())
}
