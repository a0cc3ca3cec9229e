// Mappers: Convert between gRPC protobuf types and domain models
// This keeps protobuf dependencies isolated from the packing core

use crate::domain::{
    Bin, Item, PackedBin, Packing, SolverBackend, SolverConfig, MAX_EXACT_QUANTITY,
};
use tonic::Status;

pub mod bin_packing {
    tonic::include_proto!("bin_packing");
}

use bin_packing as proto;

pub fn proto_to_domain_bin(proto_bin: proto::Bin) -> Bin {
    Bin {
        id: proto_bin.id,
        volume_capacity: proto_bin.volume_capacity,
        cost: proto_bin.cost,
    }
}

pub fn proto_to_domain_item(proto_item: proto::Item) -> Item {
    Item {
        id: proto_item.id,
        volume: proto_item.volume,
    }
}

/// Convert protobuf SolverOptions to a domain SolverConfig
pub fn proto_to_domain_config(
    options: &proto::SolverOptions,
) -> std::result::Result<SolverConfig, Box<Status>> {
    let backend = match proto::solver_options::SolverBackend::try_from(options.solver) {
        Ok(proto::solver_options::SolverBackend::Auto) => SolverBackend::Auto,
        Ok(proto::solver_options::SolverBackend::CoinCbc) => SolverBackend::CoinCbc,
        Ok(proto::solver_options::SolverBackend::Highs) => SolverBackend::Highs,
        Err(_) => return Err(Box::new(Status::invalid_argument("Invalid solver backend"))),
    };

    if options.time_limit.is_nan() || options.time_limit < 0.0 {
        return Err(Box::new(Status::invalid_argument(
            "Time limit must be a non-negative number of seconds",
        )));
    }

    Ok(SolverConfig::default()
        .with_backend(backend)
        .with_time_limit(Some(options.time_limit)))
}

/// Reject quantities the MILP backends cannot represent exactly
pub fn check_exact(bins: &[Bin], items: &[Item]) -> std::result::Result<(), Box<Status>> {
    let inexact = bins
        .iter()
        .find(|bin| !bin.is_exact())
        .map(|bin| &bin.id)
        .or_else(|| items.iter().find(|item| !item.is_exact()).map(|item| &item.id));

    match inexact {
        Some(id) => Err(Box::new(Status::invalid_argument(format!(
            "Record {} exceeds {}",
            id, MAX_EXACT_QUANTITY
        )))),
        None => Ok(()),
    }
}

/// Instance carried by a request, ready for the packer
pub struct PackInstance {
    pub bins: Vec<Bin>,
    pub items: Vec<Item>,
    pub options: Option<SolverConfig>,
}

/// Convert protobuf PackRequest to domain records
pub fn proto_to_domain_instance(
    request: proto::PackRequest,
) -> std::result::Result<PackInstance, Box<Status>> {
    let options = request
        .options
        .as_ref()
        .map(proto_to_domain_config)
        .transpose()?;
    let bins: Vec<Bin> = request.bins.into_iter().map(proto_to_domain_bin).collect();
    let items: Vec<Item> = request.items.into_iter().map(proto_to_domain_item).collect();
    check_exact(&bins, &items)?;

    Ok(PackInstance {
        bins,
        items,
        options,
    })
}

fn domain_to_proto_bin(bin: Bin) -> proto::Bin {
    proto::Bin {
        id: bin.id,
        volume_capacity: bin.volume_capacity,
        cost: bin.cost,
    }
}

fn domain_to_proto_item(item: Item) -> proto::Item {
    proto::Item {
        id: item.id,
        volume: item.volume,
    }
}

fn domain_to_proto_packed_bin(packed: PackedBin) -> proto::PackedBin {
    proto::PackedBin {
        bin: Some(domain_to_proto_bin(packed.bin)),
        items: packed.items.into_iter().map(domain_to_proto_item).collect(),
    }
}

/// Convert a domain Packing to protobuf PackResult
pub fn domain_to_proto_result(packing: Packing, solver_name: &str) -> proto::PackResult {
    let bin_count = packing.bin_count() as u64;
    let total_cost = packing.total_cost();
    let total_volume = packing.total_volume();
    let used_volume = packing.used_volume();

    proto::PackResult {
        bins: packing
            .into_bins()
            .into_iter()
            .map(domain_to_proto_packed_bin)
            .collect(),
        bin_count,
        total_cost,
        total_volume,
        used_volume,
        solver_backend: solver_name.to_string(),
    }
}
