use std::collections::{HashSet, VecDeque};

use proptest::prelude::*;
use treasure_hunt_core::{BoardError, Location, Terrain, Tile};
use treasure_hunt_system_maze_generation::{GenerationError, MazeGenerator, MazeParameters};
use treasure_hunt_world::{Board, BoardQuery};

fn parameters(width: u32, height: u32, treasure_count: u32) -> MazeParameters {
    MazeParameters {
        name: String::from("generated"),
        width,
        height,
        treasure_count,
        branch_factor: 40,
        open_factor: 15,
        max_steps: 300,
    }
}

fn open_squares_reachable_from_start(board: &Board) -> HashSet<Location> {
    let start = board.starting_location();
    let mut reached = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(location) = queue.pop_front() {
        for neighbor in location.neighbors() {
            let open = board
                .square_at(neighbor)
                .is_some_and(|square| square.terrain() != Terrain::Wall);
            if open && reached.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }
    reached
}

#[test]
fn same_seed_produces_same_layout() {
    let params = parameters(21, 13, 4);
    let first = MazeGenerator::from_seed(0x5eed)
        .generate_layout(&params)
        .expect("valid parameters");
    let second = MazeGenerator::from_seed(0x5eed)
        .generate_layout(&params)
        .expect("valid parameters");
    assert_eq!(first, second);
}

#[test]
fn generated_board_is_ready_for_play() {
    let params = parameters(17, 11, 3);
    let board = MazeGenerator::from_seed(11)
        .generate(&params)
        .expect("valid parameters");

    assert_eq!(board.name(), "generated");
    assert_eq!(board.width(), 17);
    assert_eq!(board.height(), 11);
    assert_eq!(board.max_steps(), 300);
    assert_eq!(board.remaining_steps(), 300);
    assert_eq!(board.player_location(), board.starting_location());
    assert!(board.move_history().is_empty());
    assert!(board.remaining_treasure_count() >= 1);
    assert!(board.remaining_treasure_count() <= 3);
    assert_eq!(
        board.initial_treasure_count(),
        board.remaining_treasure_count()
    );
    let start = board
        .square_at(board.starting_location())
        .expect("start lies on the grid");
    assert_eq!(start.terrain(), Terrain::Space);
    assert_eq!(start.step_count(), 1);
}

#[test]
fn fully_open_factor_leaves_no_interior_walls() {
    let mut params = parameters(12, 9, 2);
    params.open_factor = 100;
    let layout = MazeGenerator::from_seed(3)
        .generate_layout(&params)
        .expect("valid parameters");

    for (row, tiles) in layout.rows().iter().enumerate().skip(1).take(7) {
        for (col, tile) in tiles.iter().enumerate().skip(1).take(10) {
            assert_ne!(
                *tile,
                Tile::Terrain(Terrain::Wall),
                "interior cell ({row}, {col}) should be open"
            );
        }
    }
}

#[test]
fn exactly_one_player_start_is_placed() {
    let layout = MazeGenerator::from_seed(99)
        .generate_layout(&parameters(30, 20, 6))
        .expect("valid parameters");
    let starts = layout
        .rows()
        .iter()
        .flatten()
        .filter(|tile| **tile == Tile::PlayerStart)
        .count();
    assert_eq!(starts, 1);
}

#[test]
fn board_without_room_for_treasure_is_rejected() {
    let result = MazeGenerator::from_seed(1).generate(&parameters(3, 3, 1));
    assert_eq!(
        result,
        Err(GenerationError::Board(BoardError::MissingTreasure))
    );
}

#[test]
fn invalid_parameters_are_rejected() {
    let mut generator = MazeGenerator::from_seed(1);

    assert_eq!(
        generator.generate_layout(&parameters(2, 10, 1)),
        Err(GenerationError::InvalidDimensions {
            width: 2,
            height: 10
        })
    );

    let mut params = parameters(10, 10, 1);
    params.branch_factor = 101;
    assert_eq!(
        generator.generate_layout(&params),
        Err(GenerationError::FactorOutOfRange {
            factor: "branch",
            value: 101
        })
    );

    let mut params = parameters(10, 10, 1);
    params.open_factor = 250;
    assert_eq!(
        generator.generate_layout(&params),
        Err(GenerationError::FactorOutOfRange {
            factor: "open",
            value: 250
        })
    );

    assert_eq!(
        generator.generate_layout(&parameters(10, 10, 0)),
        Err(GenerationError::NoTreasure)
    );
}

#[test]
fn parameters_fall_back_to_defaults() {
    let defaults = MazeParameters::default();
    assert!(defaults.validate().is_ok());
    let board = MazeGenerator::from_entropy()
        .generate(&defaults)
        .expect("defaults describe a valid maze");
    assert_eq!(board.width(), defaults.width);
}

proptest! {
    #[test]
    fn generated_boards_keep_walls_and_reachable_treasure(
        seed in any::<u64>(),
        width in 5u32..24,
        height in 5u32..18,
        treasure_count in 1u32..6,
        branch_factor in 0u32..=100,
        open_factor in 0u32..=100,
    ) {
        let params = MazeParameters {
            name: String::from("prop"),
            width,
            height,
            treasure_count,
            branch_factor,
            open_factor,
            max_steps: 1_000,
        };
        let board = MazeGenerator::from_seed(seed)
            .generate(&params)
            .expect("boards of at least 5x5 always host a treasure");

        let width = i32::try_from(width).expect("small");
        let height = i32::try_from(height).expect("small");
        for row in 0..height {
            for col in 0..width {
                if row == 0 || col == 0 || row == height - 1 || col == width - 1 {
                    let square = board.square_at(Location::new(row, col)).expect("on grid");
                    prop_assert_eq!(square.terrain(), Terrain::Wall);
                }
            }
        }

        let reachable = open_squares_reachable_from_start(&board);
        prop_assert!(board.remaining_treasure_count() <= treasure_count as usize);
        for treasure in board.treasures() {
            prop_assert!(reachable.contains(&treasure.location()));
            prop_assert_ne!(treasure.location(), board.starting_location());
        }
    }
}
