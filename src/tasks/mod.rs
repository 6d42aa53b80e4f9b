pub mod simple_car;
