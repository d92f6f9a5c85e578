pub mod p900_joined_sales;
