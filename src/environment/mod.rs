pub mod road;
pub mod road_environment;
